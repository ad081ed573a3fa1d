//! Native state primitives the host runtime offers to components.

use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::{InstanceId, current_instance, remember, schedule_update};

struct Committed<T> {
    value: RefCell<T>,
    owner: Option<InstanceId>,
}

impl<T: PartialEq> Committed<T> {
    fn commit(&self, next: T) -> bool {
        let mut current = self.value.borrow_mut();
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    }
}

/// Write half of [`use_state`]. Writes are queued on the owning instance and
/// applied at the next flush; the same setter is handed out on every render.
pub struct Setter<T: 'static> {
    cell: Rc<Committed<T>>,
}

impl<T: 'static> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: PartialEq + 'static> Setter<T> {
    /// Schedule `value` as the next committed state.
    pub fn set(&self, value: T) {
        let cell = self.cell.clone();
        self.enqueue(Box::new(move || cell.commit(value)));
    }

    /// Schedule a transform of whatever state is committed when the update
    /// is applied.
    pub fn update(&self, f: impl FnOnce(&T) -> T + 'static) {
        let cell = self.cell.clone();
        self.enqueue(Box::new(move || {
            let next = f(&cell.value.borrow());
            cell.commit(next)
        }));
    }

    fn enqueue(&self, update: Box<dyn FnOnce() -> bool>) {
        match self.cell.owner {
            Some(owner) => schedule_update(owner, update),
            // Detached state has nothing to re-render.
            None => {
                update();
            }
        }
    }
}

impl<T: 'static> Setter<T> {
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

/// Component-local state: the value committed for this render and a setter
/// that schedules a re-render with a new one. `init` runs on first render
/// only. A write equal to the committed value does not re-render.
pub fn use_state<T: Clone + PartialEq + 'static>(init: impl FnOnce() -> T) -> (T, Setter<T>) {
    let owner = current_instance();
    let cell = remember(|| Committed {
        value: RefCell::new(init()),
        owner,
    });
    let value = cell.value.borrow().clone();
    (value, Setter { cell })
}

/// Returns the value `factory` produced for the last `deps` seen by this
/// call site, recomputing only when `deps` changes. `()` memoizes for the
/// lifetime of the instance.
pub fn use_memo<D: PartialEq + 'static, T: 'static>(deps: D, factory: impl FnOnce() -> T) -> Rc<T> {
    let slot = remember(|| RefCell::new(None::<(D, Rc<T>)>));
    let mut memo = slot.borrow_mut();

    if let Some((last, value)) = memo.as_ref() {
        if *last == deps {
            return value.clone();
        }
    }

    let value = Rc::new(factory());
    *memo = Some((deps, value.clone()));
    value
}
