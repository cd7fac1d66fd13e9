//! Single-owner arbitration for anything that moves a scroll position.
//!
//! A [`MutatorMutex`] hands out at most one live [`MutatorGuard`] at a time.
//! Requesting a new guard with a priority at least as high as the current
//! owner's cancels the owner cooperatively: its [`CancellationToken`] flips,
//! its cancel hook runs, and only then does the new guard take over. Owners
//! are expected to poll their token between animation steps.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Priority of a mutation request. Higher values preempt lower ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MutatePriority {
    /// Programmatic scrolls and flings.
    #[default]
    Default,
    /// A user gesture in progress.
    UserInput,
    /// Programmatic work that must not be interrupted by gestures.
    PreventUserInput,
}

/// Shared flag checked by a mutator between steps.
#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

struct Owner {
    id: u64,
    priority: MutatePriority,
    token: CancellationToken,
    on_cancel: Vec<Box<dyn FnOnce() + 'static>>,
}

struct MutatorInner {
    owner: RefCell<Option<Owner>>,
    next_id: Cell<u64>,
}

#[derive(Clone)]
pub struct MutatorMutex {
    inner: Rc<MutatorInner>,
}

impl MutatorMutex {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(MutatorInner {
                owner: RefCell::new(None),
                next_id: Cell::new(1),
            }),
        }
    }

    /// Attempts to become the owner with `priority`.
    ///
    /// Returns `None` when the current owner has a strictly higher priority.
    pub fn try_mutate(&self, priority: MutatePriority) -> Option<MutatorGuard> {
        let previous = {
            let mut owner = self.inner.owner.borrow_mut();
            if let Some(current) = owner.as_ref() {
                if priority < current.priority {
                    log::debug!(
                        "mutation at {priority:?} refused, owner holds {:?}",
                        current.priority
                    );
                    return None;
                }
            }
            owner.take()
        };

        if let Some(previous) = previous {
            log::debug!(
                "mutator {} ({:?}) preempted by {priority:?}",
                previous.id,
                previous.priority
            );
            previous.token.cancel();
            for hook in previous.on_cancel {
                hook();
            }
        }

        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let token = CancellationToken::new();
        *self.inner.owner.borrow_mut() = Some(Owner {
            id,
            priority,
            token: token.clone(),
            on_cancel: Vec::new(),
        });
        Some(MutatorGuard {
            mutex: Rc::downgrade(&self.inner),
            id,
            priority,
            token,
        })
    }

    pub fn is_mutating(&self) -> bool {
        self.inner.owner.borrow().is_some()
    }

    pub fn current_priority(&self) -> Option<MutatePriority> {
        self.inner.owner.borrow().as_ref().map(|owner| owner.priority)
    }
}

impl Default for MutatorMutex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MutatorMutex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutatorMutex")
            .field("current_priority", &self.current_priority())
            .finish()
    }
}

/// Proof of ownership issued by [`MutatorMutex::try_mutate`].
///
/// Dropping the guard (or calling [`MutatorGuard::release`]) gives ownership
/// back without running cancel hooks.
pub struct MutatorGuard {
    mutex: Weak<MutatorInner>,
    id: u64,
    priority: MutatePriority,
    token: CancellationToken,
}

impl MutatorGuard {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn priority(&self) -> MutatePriority {
        self.priority
    }

    /// True while this guard is still the registered owner.
    pub fn is_owner(&self) -> bool {
        self.mutex.upgrade().is_some_and(|inner| {
            inner
                .owner
                .borrow()
                .as_ref()
                .is_some_and(|owner| owner.id == self.id)
        })
    }

    /// Registers a hook that runs if another guard preempts this one.
    ///
    /// The hook runs immediately when the guard was already preempted.
    pub fn on_cancel(&self, hook: impl FnOnce() + 'static) {
        if self.token.is_cancelled() {
            hook();
            return;
        }
        let Some(inner) = self.mutex.upgrade() else {
            return;
        };
        let mut owner = inner.owner.borrow_mut();
        if let Some(owner) = owner.as_mut().filter(|owner| owner.id == self.id) {
            owner.on_cancel.push(Box::new(hook));
        }
    }

    /// Gives up ownership. Returns `false` if the guard was no longer the owner.
    pub fn release(&self) -> bool {
        let Some(inner) = self.mutex.upgrade() else {
            return false;
        };
        let mut owner = inner.owner.borrow_mut();
        if owner.as_ref().is_some_and(|owner| owner.id == self.id) {
            *owner = None;
            true
        } else {
            false
        }
    }
}

impl Drop for MutatorGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for MutatorGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutatorGuard")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}
