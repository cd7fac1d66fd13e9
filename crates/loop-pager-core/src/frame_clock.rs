use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

pub type FrameCallbackId = u64;

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct FrameClockInner {
    callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_callback_id: Cell<FrameCallbackId>,
    last_frame_nanos: Cell<Option<u64>>,
}

impl FrameClockInner {
    fn register(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_callback_id.get();
        self.next_callback_id.set(id + 1);
        self.callbacks.borrow_mut().push_back(FrameCallbackEntry {
            id,
            callback: Some(callback),
        });
        id
    }

    fn cancel(&self, id: FrameCallbackId) {
        // Cancellation can happen from inside a callback while the queue is
        // being drained; in that case the entry was already popped.
        if let Ok(mut callbacks) = self.callbacks.try_borrow_mut() {
            if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
                callbacks.remove(index);
            }
        }
    }
}

/// Single-threaded frame clock.
///
/// Animations register one-shot callbacks that run on the next call to
/// [`FrameClock::drain_frame_callbacks`]. Callbacks registered while a frame
/// is being drained are deferred to the following frame, which is what lets an
/// animation reschedule itself step by step.
#[derive(Clone)]
pub struct FrameClock {
    inner: Rc<FrameClockInner>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(FrameClockInner {
                callbacks: RefCell::new(VecDeque::new()),
                next_callback_id: Cell::new(1),
                last_frame_nanos: Cell::new(None),
            }),
        }
    }

    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let id = self.inner.register(Box::new(callback));
        FrameCallbackRegistration {
            clock: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Runs every callback queued before this call with `frame_time_nanos`.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        self.inner.last_frame_nanos.set(Some(frame_time_nanos));
        let pending: SmallVec<[Box<dyn FnOnce(u64) + 'static>; 4]> = {
            let mut callbacks = self.inner.callbacks.borrow_mut();
            callbacks
                .drain(..)
                .filter_map(|mut entry| entry.callback.take())
                .collect()
        };
        log::trace!(
            "frame {frame_time_nanos}: running {} callbacks",
            pending.len()
        );
        for callback in pending {
            callback(frame_time_nanos);
        }
    }

    pub fn has_frame_callbacks(&self) -> bool {
        !self.inner.callbacks.borrow().is_empty()
    }

    pub fn pending_callback_count(&self) -> usize {
        self.inner.callbacks.borrow().len()
    }

    /// Time of the most recently drained frame.
    pub fn last_frame_nanos(&self) -> Option<u64> {
        self.inner.last_frame_nanos.get()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameClock")
            .field("pending_callbacks", &self.pending_callback_count())
            .field("last_frame_nanos", &self.last_frame_nanos())
            .finish()
    }
}

/// Handle to a queued frame callback. Dropping it cancels the callback.
pub struct FrameCallbackRegistration {
    clock: Weak<FrameClockInner>,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    pub fn id(&self) -> Option<FrameCallbackId> {
        self.id
    }

    pub fn cancel(mut self) {
        self.cancel_in_place();
    }

    fn cancel_in_place(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(clock) = self.clock.upgrade() {
                clock.cancel(id);
            }
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        self.cancel_in_place();
    }
}
