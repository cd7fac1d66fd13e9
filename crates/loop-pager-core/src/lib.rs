//! Runtime pieces shared by the loop pager crates: a frame clock that drives
//! animations one frame at a time, and the mutex that decides which motion
//! source currently owns a scroll position.

mod frame_clock;
mod mutator;

pub use frame_clock::{FrameCallbackId, FrameCallbackRegistration, FrameClock};
pub use mutator::{CancellationToken, MutatePriority, MutatorGuard, MutatorMutex};

/// Nominal frame duration used by headless drivers (60 Hz).
pub const FRAME_NANOS: u64 = 16_666_667;
