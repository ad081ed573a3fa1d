//! # Components, State, and the Ergo handle
//!
//! `ergo-core` is a small component runtime built around one idea: a piece of
//! state should be a single handle you can both read and write, instead of a
//! `(value, setter)` pair that goes stale between renders.
//!
//! - `Scheduler` — mounts components and settles queued state updates.
//! - `remember*` / `use_state` / `use_memo` — slot storage bound to a
//!   component instance.
//! - `ErgoState<T>` — the read/write handle built on top of them.
//!
//! ## Components
//!
//! A component is any `Fn() -> View`. It is re-run whenever state it owns
//! changes:
//!
//! ```rust
//! use ergo_core::*;
//!
//! let mut scheduler = Scheduler::new();
//! let id = scheduler.mount(|| Text("hello"));
//! assert_eq!(scheduler.render_count(id), 1);
//! ```
//!
//! ## Native state
//!
//! `use_state` returns the value committed for this render and a `Setter`.
//! Setters queue an update and mark the instance dirty; nothing re-renders
//! until `Scheduler::flush` (or `Scheduler::batch`) runs. An update that
//! leaves the value unchanged does not re-render.
//!
//! ```rust
//! use ergo_core::*;
//!
//! fn Counter() -> View {
//!     let (count, set_count) = use_state(|| 0);
//!     Button(format!("Count = {count}"), move || set_count.set(count + 1))
//! }
//! # let mut scheduler = Scheduler::new();
//! # scheduler.mount(Counter);
//! ```
//!
//! - `remember` and `use_state` are order‑based: the Nth call in a
//!   component always refers to the Nth stored value.
//! - `remember_with_key` is key‑based and stable across conditional branches.
//!
//! ## Ergo state
//!
//! `use_ergo_state` wraps the same primitive in one handle. `get()` reads the
//! latest written value, `set`/`update`/`write` write it and return it. See
//! the [`ergo`] module for details.
//!
//! ```rust
//! use ergo_core::*;
//!
//! fn Counter() -> View {
//!     let count = use_ergo_state(|| 0);
//!     Button(format!("Count = {}", count.get()), move || {
//!         count.update(|c| c + 1);
//!     })
//! }
//! # let mut scheduler = Scheduler::new();
//! # scheduler.mount(Counter);
//! ```

pub mod ergo;
pub mod prelude;
pub mod runtime;
pub mod semantics;
pub mod state;
pub mod view;
pub mod widgets;

pub use prelude::*;
