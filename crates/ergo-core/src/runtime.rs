use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use bitflags::bitflags;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::view::View;

thread_local! {
    pub static COMPOSER: RefCell<Composer> = RefCell::new(Composer::default());
}

new_key_type! {
    /// Handle to one mounted component instance.
    pub struct InstanceId;
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct InstanceFlags: u8 {
        const MOUNTED = 1 << 0;
        /// Has queued updates waiting for the next flush.
        const DIRTY = 1 << 1;
        const RENDERING = 1 << 2;
    }
}

pub type Component = Rc<dyn Fn() -> View>;

/// A queued state write. Returns `true` when it changed the committed value.
pub type Update = Box<dyn FnOnce() -> bool>;

pub struct Instance {
    component: Component,
    slots: Vec<Box<dyn Any>>,
    cursor: usize,
    keyed_slots: HashMap<String, Box<dyn Any>>,
    pending: SmallVec<[Update; 4]>,
    flags: InstanceFlags,
    renders: u64,
    view: Option<View>,
}

impl Instance {
    fn new(component: Component) -> Self {
        Self {
            component,
            slots: Vec::new(),
            cursor: 0,
            keyed_slots: HashMap::new(),
            pending: SmallVec::new(),
            flags: InstanceFlags::MOUNTED,
            renders: 0,
            view: None,
        }
    }
}

/// Per-thread arena of component instances plus the queue of dirty ones.
#[derive(Default)]
pub struct Composer {
    instances: SlotMap<InstanceId, Instance>,
    current: Option<InstanceId>,
    dirty: VecDeque<InstanceId>,
}

impl Composer {
    fn current_mut(&mut self) -> Option<&mut Instance> {
        let id = self.current?;
        self.instances.get_mut(id)
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

/// Installs an instance as the one hooks resolve against for the duration
/// of a render.
pub struct ComposeGuard {
    id: InstanceId,
    prev: Option<InstanceId>,
}

impl ComposeGuard {
    pub fn begin(id: InstanceId) -> Self {
        let prev = COMPOSER.with(|c| {
            let mut c = c.borrow_mut();
            if let Some(inst) = c.instances.get_mut(id) {
                inst.cursor = 0;
                inst.flags.insert(InstanceFlags::RENDERING);
            }
            c.current.replace(id)
        });
        ComposeGuard { id, prev }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }
}

impl Drop for ComposeGuard {
    fn drop(&mut self) {
        COMPOSER.with(|c| {
            let mut c = c.borrow_mut();
            if let Some(inst) = c.instances.get_mut(self.id) {
                inst.flags.remove(InstanceFlags::RENDERING);
            }
            c.current = self.prev;
        });
    }
}

/// The instance currently rendering, if any.
pub fn current_instance() -> Option<InstanceId> {
    COMPOSER.with(|c| c.borrow().current)
}

enum SlotLookup<T> {
    Hit(Rc<T>),
    Reserved,
    Detached,
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    let mut cursor = 0;
    let lookup = COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let Some(inst) = c.current_mut() else {
            return SlotLookup::Detached;
        };
        cursor = inst.cursor;
        inst.cursor += 1;

        match inst.slots.get(cursor) {
            Some(slot) => match slot.downcast_ref::<Rc<T>>() {
                Some(rc) => SlotLookup::Hit(rc.clone()),
                None => {
                    log::warn!(
                        "remember: slot {} type changed; replacing. \
                         If this is due to conditional composition, prefer remember_with_key.",
                        cursor
                    );
                    SlotLookup::Reserved
                }
            },
            None => {
                // Reserve the position so hooks called from `init` land after it.
                inst.slots.push(Box::new(()));
                SlotLookup::Reserved
            }
        }
    });

    match lookup {
        SlotLookup::Hit(rc) => rc,
        SlotLookup::Reserved => {
            let rc: Rc<T> = Rc::new(init());
            let fresh: Box<dyn Any> = Box::new(rc.clone());
            let stale = COMPOSER.with(|c| {
                let mut c = c.borrow_mut();
                c.current_mut()
                    .and_then(|inst| inst.slots.get_mut(cursor))
                    .map(|slot| std::mem::replace(slot, fresh))
            });
            drop(stale);
            rc
        }
        SlotLookup::Detached => {
            log::warn!("remember: called outside of a component render; the value will not persist");
            Rc::new(init())
        }
    }
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    let key = key.into();
    let lookup = COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let Some(inst) = c.current_mut() else {
            return SlotLookup::Detached;
        };

        if let Some(existing) = inst.keyed_slots.get(&key) {
            if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
                return SlotLookup::Hit(rc.clone());
            }
            log::warn!(
                "remember_with_key: key '{}' reused with a different type; replacing.",
                key
            );
        }
        SlotLookup::Reserved
    });

    match lookup {
        SlotLookup::Hit(rc) => rc,
        SlotLookup::Reserved => {
            let rc: Rc<T> = Rc::new(init());
            let fresh: Box<dyn Any> = Box::new(rc.clone());
            let stale = COMPOSER.with(|c| {
                let mut c = c.borrow_mut();
                c.current_mut()
                    .and_then(|inst| inst.keyed_slots.insert(key, fresh))
            });
            drop(stale);
            rc
        }
        SlotLookup::Detached => {
            log::warn!(
                "remember_with_key: key '{}' used outside of a component render; the value will not persist",
                key
            );
            Rc::new(init())
        }
    }
}

/// Queue `update` on `owner` and mark it dirty. Updates for instances that
/// are gone are dropped.
pub(crate) fn schedule_update(owner: InstanceId, update: Update) {
    let dropped = COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let Composer {
            instances, dirty, ..
        } = &mut *c;
        match instances.get_mut(owner) {
            Some(inst) => {
                inst.pending.push(update);
                if !inst.flags.contains(InstanceFlags::DIRTY) {
                    inst.flags.insert(InstanceFlags::DIRTY);
                    dirty.push_back(owner);
                }
                None
            }
            None => Some(update),
        }
    });
    if dropped.is_some() {
        log::debug!("state update for unmounted instance {:?} ignored", owner);
    }
}

/// Runs the queued updates of `id` in call order. Returns whether any of
/// them changed committed state.
fn apply_pending(id: InstanceId) -> bool {
    let pending = COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        c.instances.get_mut(id).map(|inst| {
            inst.flags.remove(InstanceFlags::DIRTY);
            std::mem::take(&mut inst.pending)
        })
    });
    let Some(pending) = pending else {
        return false;
    };

    let mut changed = false;
    for update in pending {
        changed |= update();
    }
    changed
}

fn render_instance(id: InstanceId) -> bool {
    let component = COMPOSER.with(|c| c.borrow().instances.get(id).map(|i| i.component.clone()));
    let Some(component) = component else {
        return false;
    };

    let view = {
        let _guard = ComposeGuard::begin(id);
        component()
    };

    #[cfg(feature = "inspector")]
    log::trace!("{:?} rendered:\n{:#?}", id, view);

    let previous = COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        c.instances.get_mut(id).and_then(|inst| {
            inst.renders += 1;
            inst.view.replace(view)
        })
    });
    drop(previous);
    true
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Upper bound on renders performed by a single `flush`. Hitting it
    /// usually means a component writes state unconditionally while rendering.
    pub max_flush_passes: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_flush_passes: 100,
        }
    }
}

/// Mounts components and settles their queued state updates.
pub struct Scheduler {
    config: SchedulerConfig,
    roots: Vec<InstanceId>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            roots: Vec::new(),
        }
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    /// Creates an instance, renders it once and settles anything it queued
    /// while rendering.
    pub fn mount(&mut self, component: impl Fn() -> View + 'static) -> InstanceId {
        let component: Component = Rc::new(component);
        let id = COMPOSER.with(|c| c.borrow_mut().instances.insert(Instance::new(component)));
        self.roots.push(id);
        log::debug!("mount {:?}", id);

        render_instance(id);
        self.flush();
        id
    }

    /// Re-renders this scheduler's dirty instances until none are left,
    /// returning how many renders happened. Instances whose updates changed
    /// nothing bail out.
    pub fn flush(&mut self) -> usize {
        let mut renders = 0;
        loop {
            if renders >= self.config.max_flush_passes {
                let still_dirty =
                    COMPOSER.with(|c| c.borrow().dirty.iter().any(|id| self.owns(*id)));
                if still_dirty {
                    log::error!(
                        "flush: exceeded {} renders; leaving remaining updates queued",
                        self.config.max_flush_passes
                    );
                }
                break;
            }

            let Some(id) = self.pop_dirty() else {
                break;
            };

            if apply_pending(id) {
                if render_instance(id) {
                    log::debug!("rerender {:?}", id);
                    renders += 1;
                }
            } else {
                log::debug!("bail out {:?}: state unchanged", id);
            }
        }
        renders
    }

    /// Runs `f` (typically an event handler) and settles the updates it
    /// queued.
    pub fn batch<R>(&mut self, f: impl FnOnce() -> R) -> R {
        let out = f();
        self.flush();
        out
    }

    /// Tears down an instance mounted by this scheduler, dropping all of its
    /// remembered state.
    pub fn unmount(&mut self, id: InstanceId) -> bool {
        if !self.owns(id) {
            log::warn!("unmount {:?}: not mounted by this scheduler", id);
            return false;
        }
        let removed = COMPOSER.with(|c| {
            let mut c = c.borrow_mut();
            c.dirty.retain(|d| *d != id);
            c.instances.remove(id)
        });
        self.roots.retain(|r| *r != id);
        match removed {
            Some(inst) => {
                log::debug!("unmount {:?} after {} renders", id, inst.renders);
                drop(inst);
                true
            }
            None => false,
        }
    }

    fn owns(&self, id: InstanceId) -> bool {
        self.roots.contains(&id)
    }

    /// Next dirty instance this scheduler mounted. Other schedulers' entries
    /// stay queued.
    fn pop_dirty(&self) -> Option<InstanceId> {
        COMPOSER.with(|c| {
            let mut c = c.borrow_mut();
            let pos = c.dirty.iter().position(|id| self.owns(*id))?;
            c.dirty.remove(pos)
        })
    }

    pub fn is_mounted(&self, id: InstanceId) -> bool {
        COMPOSER.with(|c| {
            c.borrow()
                .instances
                .get(id)
                .is_some_and(|i| i.flags.contains(InstanceFlags::MOUNTED))
        })
    }

    pub fn render_count(&self, id: InstanceId) -> u64 {
        COMPOSER.with(|c| c.borrow().instances.get(id).map_or(0, |i| i.renders))
    }

    /// Last view rendered by `id`.
    pub fn view(&self, id: InstanceId) -> Option<View> {
        COMPOSER.with(|c| c.borrow().instances.get(id).and_then(|i| i.view.clone()))
    }

    pub fn flags(&self, id: InstanceId) -> InstanceFlags {
        COMPOSER.with(|c| {
            c.borrow()
                .instances
                .get(id)
                .map_or(InstanceFlags::empty(), |i| i.flags)
        })
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for id in self.roots.clone() {
            self.unmount(id);
        }
    }
}
