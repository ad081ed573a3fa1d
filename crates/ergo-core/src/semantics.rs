/// High‑level semantic role of a view, similar to ARIA roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Text,
    Button,
    Container,
}

/// Semantics attached to a `View`.
#[derive(Clone, Debug)]
pub struct Semantics {
    pub role: Role,
    /// Accessible name; when unset, `View::accessible_name` falls back to
    /// the view's text.
    pub label: Option<String>,
    /// Disabled nodes stay queryable but ignore clicks.
    pub enabled: bool,
}

impl Semantics {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            label: None,
            enabled: true,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
