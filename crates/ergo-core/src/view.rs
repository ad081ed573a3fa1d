use std::rc::Rc;

use crate::semantics::{Role, Semantics};

pub type Callback = Rc<dyn Fn()>;

#[derive(Clone)]
pub enum ViewKind {
    Fragment,
    Text { text: String },
    Button {
        text: String,
        on_click: Option<Callback>,
    },
}

impl std::fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Fragment => write!(f, "Fragment"),
            ViewKind::Text { text } => f.debug_struct("Text").field("text", text).finish(),
            ViewKind::Button { text, on_click } => f
                .debug_struct("Button")
                .field("text", text)
                .field("on_click", &on_click.as_ref().map(|_| "<callback>"))
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct View {
    pub kind: ViewKind,
    /// Lookup handle for tests, the equivalent of a `data-testid`.
    pub test_id: Option<String>,
    pub children: Vec<View>,
    pub semantics: Option<Semantics>,
}

impl View {
    pub fn new(kind: ViewKind) -> Self {
        View {
            kind,
            test_id: None,
            children: vec![],
            semantics: None,
        }
    }
    pub fn test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id = Some(id.into());
        self
    }
    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }
    pub fn semantics(mut self, s: Semantics) -> Self {
        self.semantics = Some(s);
        self
    }

    /// Explicit semantics role, else one derived from the kind.
    pub fn role(&self) -> Role {
        if let Some(s) = &self.semantics {
            return s.role;
        }
        match self.kind {
            ViewKind::Fragment => Role::Container,
            ViewKind::Text { .. } => Role::Text,
            ViewKind::Button { .. } => Role::Button,
        }
    }

    /// Concatenated text of this view and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            ViewKind::Text { text } | ViewKind::Button { text, .. } => out.push_str(text),
            ViewKind::Fragment => {}
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Semantics label if one is set, else the text content.
    pub fn accessible_name(&self) -> String {
        match self.semantics.as_ref().and_then(|s| s.label.clone()) {
            Some(label) => label,
            None => self.text_content(),
        }
    }

    pub fn on_click(&self) -> Option<Callback> {
        match &self.kind {
            ViewKind::Button { on_click, .. } => on_click.clone(),
            _ => None,
        }
    }

    /// Depth-first walk yielding each view with its child-index path from
    /// `self`.
    pub fn walk(&self) -> Vec<(Vec<usize>, &View)> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        self.walk_into(&mut path, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, path: &mut Vec<usize>, out: &mut Vec<(Vec<usize>, &'a View)>) {
        out.push((path.clone(), self));
        for (i, child) in self.children.iter().enumerate() {
            path.push(i);
            child.walk_into(path, out);
            path.pop();
        }
    }

    /// Resolve a path produced by [`View::walk`].
    pub fn at(&self, path: &[usize]) -> Option<&View> {
        path.iter()
            .try_fold(self, |view, &i| view.children.get(i))
    }
}
