//! Headless rendering and queries for tests.
//!
//! ```rust
//! use ergo_core::*;
//! use ergo_harness::render;
//!
//! let page = render(|| {
//!     let count = use_ergo_state(|| 0);
//!     Fragment(vec![
//!         Text(format!("Count is {}", count.get())).test_id("count"),
//!         Button("Increment", move || {
//!             count.set(count.get() + 1);
//!         }),
//!     ])
//! });
//!
//! let button = page.get_by_role(Role::Button).unwrap();
//! page.click(&button).unwrap();
//! assert_eq!(page.text_of_test_id("count").unwrap(), "Count is 1");
//! ```

use std::cell::RefCell;

use ergo_core::{InstanceId, Role, Scheduler, View};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("unable to find an element by {query}")]
    NotFound { query: String },
    #[error("found {count} elements by {query}; expected exactly one")]
    Multiple { query: String, count: usize },
    #[error("element found by {query} is not clickable")]
    NotClickable { query: String },
    #[error("the page has been unmounted")]
    Unmounted,
}

/// A located element. It records where the element sits in the tree, so it
/// keeps resolving to the freshest render of that position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    path: Vec<usize>,
    query: String,
}

impl Element {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// One mounted component under test.
pub struct Page {
    scheduler: RefCell<Scheduler>,
    root: InstanceId,
}

/// Mount `component` and settle its first render.
pub fn render(component: impl Fn() -> View + 'static) -> Page {
    let mut scheduler = Scheduler::new();
    let root = scheduler.mount(component);
    Page {
        scheduler: RefCell::new(scheduler),
        root,
    }
}

impl Page {
    pub fn root(&self) -> InstanceId {
        self.root
    }

    /// Renders of the root component so far, including the first.
    pub fn render_count(&self) -> u64 {
        self.scheduler.borrow().render_count(self.root)
    }

    pub fn view(&self) -> Result<View, QueryError> {
        self.scheduler
            .borrow()
            .view(self.root)
            .ok_or(QueryError::Unmounted)
    }

    pub fn get_by_role(&self, role: Role) -> Result<Element, QueryError> {
        self.find_one(format!("role {role:?}"), |v| v.role() == role)
    }

    pub fn get_by_test_id(&self, id: &str) -> Result<Element, QueryError> {
        self.find_one(format!("test id {id:?}"), |v| {
            v.test_id.as_deref() == Some(id)
        })
    }

    /// Matches views whose own text equals `text`.
    pub fn get_by_text(&self, text: &str) -> Result<Element, QueryError> {
        self.find_one(format!("text {text:?}"), |v| {
            v.children.is_empty() && v.text_content() == text
        })
    }

    /// Matches views carrying semantics whose accessible name is `label`.
    /// Buttons without an explicit label are named by their text.
    pub fn get_by_label(&self, label: &str) -> Result<Element, QueryError> {
        self.find_one(format!("label {label:?}"), |v| {
            v.semantics.is_some() && v.accessible_name() == label
        })
    }

    /// Text of `element` in the latest render.
    pub fn text_content(&self, element: &Element) -> Result<String, QueryError> {
        let view = self.view()?;
        let node = view.at(&element.path).ok_or_else(|| QueryError::NotFound {
            query: element.query.clone(),
        })?;
        Ok(node.text_content())
    }

    pub fn text_of_test_id(&self, id: &str) -> Result<String, QueryError> {
        let element = self.get_by_test_id(id)?;
        self.text_content(&element)
    }

    /// Fire `element`'s click handler from the latest render and settle the
    /// updates it queued.
    pub fn click(&self, element: &Element) -> Result<(), QueryError> {
        let view = self.view()?;
        let node = view.at(&element.path).ok_or_else(|| QueryError::NotFound {
            query: element.query.clone(),
        })?;
        let enabled = node.semantics.as_ref().is_none_or(|s| s.enabled);
        let handler = node
            .on_click()
            .filter(|_| enabled)
            .ok_or_else(|| QueryError::NotClickable {
                query: element.query.clone(),
            })?;

        log::debug!("click {}", element.query);
        self.scheduler.borrow_mut().batch(|| handler());
        Ok(())
    }

    /// Settle updates queued outside of `click`.
    pub fn flush(&self) -> usize {
        self.scheduler.borrow_mut().flush()
    }

    pub fn unmount(self) {
        self.scheduler.borrow_mut().unmount(self.root);
    }

    fn find_one(
        &self,
        query: String,
        matches: impl Fn(&View) -> bool,
    ) -> Result<Element, QueryError> {
        let view = self.view()?;
        let mut found: Vec<Vec<usize>> = view
            .walk()
            .into_iter()
            .filter(|(_, v)| matches(v))
            .map(|(path, _)| path)
            .collect();

        match found.len() {
            0 => Err(QueryError::NotFound { query }),
            1 => Ok(Element {
                path: found.remove(0),
                query,
            }),
            count => Err(QueryError::Multiple { query, count }),
        }
    }
}
