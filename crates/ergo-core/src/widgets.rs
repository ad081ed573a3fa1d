#![allow(non_snake_case)]
//! View constructors.

use std::rc::Rc;

use crate::semantics::{Role, Semantics};
use crate::view::{View, ViewKind};

pub fn Fragment(children: Vec<View>) -> View {
    View::new(ViewKind::Fragment).with_children(children)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(ViewKind::Text { text: text.into() })
}

pub fn Button(text: impl Into<String>, on_click: impl Fn() + 'static) -> View {
    View::new(ViewKind::Button {
        text: text.into(),
        on_click: Some(Rc::new(on_click)),
    })
    .semantics(Semantics::new(Role::Button))
}
