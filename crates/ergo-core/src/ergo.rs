//! One handle that both reads and writes component state.
//!
//! `use_ergo_state` folds the `(value, setter)` pair returned by
//! [`use_state`](crate::state::use_state) into a single [`ErgoState`]:
//!
//! ```rust
//! use ergo_core::*;
//!
//! fn Counter() -> View {
//!     let count = use_ergo_state(|| 0);
//!
//!     Fragment(vec![
//!         Text(format!("Count is {}", count.get())).test_id("count"),
//!         Button("Increment", move || {
//!             count.set(count.get() + 1);
//!         }),
//!     ])
//! }
//! # let mut scheduler = Scheduler::new();
//! # scheduler.mount(Counter);
//! ```
//!
//! Writes go through the host setter, so an `ErgoState` renders exactly as
//! often as the setter would. The handle additionally keeps a shadow copy of
//! the last written value, which makes a read right after a write observe it
//! before the host has re-rendered.
//!
//! ## Values and transforms
//!
//! [`ErgoState::write`] accepts either a new value or a transform of the
//! latest one. Which it is comes from the argument's type: a value must be
//! exactly `S`, a transform must be `FnOnce(S) -> S`.
//!
//! ```rust
//! use ergo_core::*;
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.mount(|| {
//!     let count = use_ergo_state(|| 1i32);
//!     assert_eq!(count.write(|c| c + 1), 2);
//!     assert_eq!(count.write(10i32), 10);
//!     Text("")
//! });
//! ```
//!
//! For state that is itself a function, a bare function is never taken as
//! the new value. Neither `write` nor `set` compiles with one:
//!
//! ```rust,compile_fail
//! use ergo_core::*;
//!
//! fn double(x: i32) -> i32 { x * 2 }
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.mount(|| {
//!     let op = use_ergo_state(|| double as fn(i32) -> i32);
//!     op.write(double);
//!     Text("")
//! });
//! ```
//!
//! ```rust,compile_fail
//! use ergo_core::*;
//!
//! fn double(x: i32) -> i32 { x * 2 }
//! fn negate(x: i32) -> i32 { -x }
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.mount(|| {
//!     let op = use_ergo_state(|| double as fn(i32) -> i32);
//!     op.set(negate);
//!     Text("")
//! });
//! ```
//!
//! ```rust,compile_fail
//! use ergo_core::*;
//!
//! fn negate(x: i32) -> i32 { -x }
//!
//! let action: StateAction<fn(i32) -> i32> = StateAction::value(negate);
//! ```
//!
//! Pass a transform instead:
//!
//! ```rust
//! use ergo_core::*;
//!
//! fn double(x: i32) -> i32 { x * 2 }
//! fn triple(x: i32) -> i32 { x * 3 }
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.mount(|| {
//!     let op = use_ergo_state(|| double as fn(i32) -> i32);
//!     let next = op.update(|_| triple as fn(i32) -> i32);
//!     assert_eq!(next(2), 6);
//!     Text("")
//! });
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::state::{self, Setter, use_memo};

/// An explicit write, for callers that build the argument at runtime.
pub struct StateAction<S: 'static>(Action<S>);

enum Action<S: 'static> {
    Value(S),
    Transform(Box<dyn FnOnce(S) -> S>),
}

impl<S: 'static> StateAction<S> {
    pub fn value<V: StateValue<S>>(value: V) -> Self {
        StateAction(Action::Value(value.into_state()))
    }

    pub fn transform(f: impl FnOnce(S) -> S + 'static) -> Self {
        StateAction(Action::Transform(Box::new(f)))
    }
}

impl<S: 'static> std::fmt::Debug for StateAction<S>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Action::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Action::Transform(_) => f.write_str("Transform(<fn>)"),
        }
    }
}

/// A value of exactly `S`. Being generic, it rules out the call-site
/// coercion of a function item into a function-pointer `S`.
pub trait StateValue<S> {
    fn into_state(self) -> S;
}

impl<S> StateValue<S> for S {
    fn into_state(self) -> S {
        self
    }
}

#[doc(hidden)]
pub struct ValueMarker;
#[doc(hidden)]
pub struct TransformMarker;
#[doc(hidden)]
pub struct ActionMarker;
#[doc(hidden)]
pub struct SomeMarker;

/// Anything [`ErgoState::write`] accepts. `M` only disambiguates impls and
/// is always inferred.
pub trait IntoStateAction<S, M> {
    /// Produce the next state. `latest` yields the current shadow value and
    /// is only called by transforms.
    fn resolve(self, latest: impl FnOnce() -> S) -> S;
}

impl<S> IntoStateAction<S, ValueMarker> for S {
    fn resolve(self, _latest: impl FnOnce() -> S) -> S {
        self
    }
}

impl<S, F> IntoStateAction<S, TransformMarker> for F
where
    F: FnOnce(S) -> S,
{
    fn resolve(self, latest: impl FnOnce() -> S) -> S {
        self(latest())
    }
}

impl<S: 'static> IntoStateAction<S, ActionMarker> for StateAction<S> {
    fn resolve(self, latest: impl FnOnce() -> S) -> S {
        match self.0 {
            Action::Value(v) => v,
            Action::Transform(f) => f(latest()),
        }
    }
}

/// Lets optional state be written with a bare `S`.
impl<S> IntoStateAction<Option<S>, SomeMarker> for S {
    fn resolve(self, _latest: impl FnOnce() -> Option<S>) -> Option<S> {
        Some(self)
    }
}

struct Shared<S: 'static> {
    shadow: RefCell<S>,
    setter: Setter<S>,
}

/// Read/write handle over one piece of component state.
///
/// Cloning is cheap and every clone, on every render of the same instance,
/// refers to the same state (see [`ErgoState::ptr_eq`]).
pub struct ErgoState<S: 'static> {
    inner: Rc<Shared<S>>,
}

impl<S: 'static> Clone for ErgoState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: Clone + PartialEq + 'static> ErgoState<S> {
    /// The last value written, or the initial one. Never re-renders.
    pub fn get(&self) -> S {
        self.inner.shadow.borrow().clone()
    }

    /// Write `value` and return it.
    pub fn set<V: StateValue<S>>(&self, value: V) -> S {
        self.commit(value.into_state())
    }

    /// Write `f(latest)` and return it.
    pub fn update(&self, f: impl FnOnce(&S) -> S) -> S {
        let latest = self.get();
        self.commit(f(&latest))
    }

    /// Write a value or a transform, whichever `action` is.
    pub fn write<M, A: IntoStateAction<S, M>>(&self, action: A) -> S {
        let next = action.resolve(|| self.get());
        self.commit(next)
    }

    /// Reads with `None`, writes with `Some`.
    pub fn call(&self, action: Option<StateAction<S>>) -> S {
        match action {
            None => self.get(),
            Some(action) => self.write(action),
        }
    }

    fn commit(&self, next: S) -> S {
        *self.inner.shadow.borrow_mut() = next.clone();
        self.inner.setter.set(next.clone());
        next
    }
}

impl<S: 'static> ErgoState<S> {
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Handles compare by identity, so they can key `use_memo`.
impl<S: 'static> PartialEq for ErgoState<S> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<S: 'static> Eq for ErgoState<S> {}

impl<S: std::fmt::Debug + 'static> std::fmt::Debug for ErgoState<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ErgoState")
            .field(&*self.inner.shadow.borrow())
            .finish()
    }
}

/// State handle seeded from `init`, which runs on first render only.
pub fn use_ergo_state<S: Clone + PartialEq + 'static>(init: impl FnOnce() -> S) -> ErgoState<S> {
    let (committed, set_state) = state::use_state(init);
    let handle = use_memo((), move || ErgoState {
        inner: Rc::new(Shared {
            shadow: RefCell::new(committed),
            setter: set_state,
        }),
    });
    (*handle).clone()
}

/// State handle seeded from a ready value.
pub fn use_ergo_state_value<S: Clone + PartialEq + 'static>(value: S) -> ErgoState<S> {
    use_ergo_state(move || value)
}

/// State handle with no initial value: reads `None` until the first write.
pub fn use_optional_ergo_state<S: Clone + PartialEq + 'static>() -> ErgoState<Option<S>> {
    use_ergo_state(|| None)
}

pub use use_ergo_state as use_state;
