//! Drives a [`FrameClock`] by hand so animations run without a display.

use loop_pager_core::{FrameClock, FRAME_NANOS};
use std::cell::Cell;

/// Frames [`PagerTestRule::advance_until_idle`] pumps before giving up.
pub const MAX_IDLE_FRAMES: usize = 2_000;

/// Headless frame pump shared by a test and the pager under test.
///
/// Hand [`clock`](Self::clock) to the pager, then advance frames explicitly.
/// The first pumped frame is at time zero.
pub struct PagerTestRule {
    clock: FrameClock,
    frame_time_nanos: Cell<u64>,
    frame_nanos: u64,
    frames: Cell<usize>,
}

impl Default for PagerTestRule {
    fn default() -> Self {
        Self::new()
    }
}

impl PagerTestRule {
    pub fn new() -> Self {
        Self::with_frame_nanos(FRAME_NANOS)
    }

    pub fn with_frame_nanos(frame_nanos: u64) -> Self {
        Self {
            clock: FrameClock::new(),
            frame_time_nanos: Cell::new(0),
            frame_nanos: frame_nanos.max(1),
            frames: Cell::new(0),
        }
    }

    pub fn clock(&self) -> FrameClock {
        self.clock.clone()
    }

    /// Time of the next frame to be pumped.
    pub fn frame_time_nanos(&self) -> u64 {
        self.frame_time_nanos.get()
    }

    /// Frames pumped so far.
    pub fn frame_count(&self) -> usize {
        self.frames.get()
    }

    pub fn has_pending_frames(&self) -> bool {
        self.clock.has_frame_callbacks()
    }

    pub fn advance_frame(&self) {
        self.clock.drain_frame_callbacks(self.frame_time_nanos.get());
        self.frame_time_nanos
            .set(self.frame_time_nanos.get() + self.frame_nanos);
        self.frames.set(self.frames.get() + 1);
    }

    pub fn advance_frames(&self, count: usize) {
        for _ in 0..count {
            self.advance_frame();
        }
    }

    /// Pumps frames covering at least `millis` of animation time.
    pub fn advance_time_by_millis(&self, millis: u64) {
        let frames = (millis * 1_000_000).div_ceil(self.frame_nanos);
        self.advance_frames(frames as usize);
    }

    /// Pumps frames until nothing is scheduled and returns how many ran.
    ///
    /// Panics after [`MAX_IDLE_FRAMES`], which means an animation never
    /// settles.
    pub fn advance_until_idle(&self) -> usize {
        let mut frames = 0;
        while self.clock.has_frame_callbacks() {
            assert!(
                frames < MAX_IDLE_FRAMES,
                "animations still running after {MAX_IDLE_FRAMES} frames"
            );
            self.advance_frame();
            frames += 1;
        }
        frames
    }

    /// Pumps frames until `condition` holds. Returns false if the clock went
    /// idle first.
    pub fn advance_until(&self, mut condition: impl FnMut() -> bool) -> bool {
        let mut frames = 0;
        while !condition() {
            if !self.clock.has_frame_callbacks() || frames >= MAX_IDLE_FRAMES {
                return false;
            }
            self.advance_frame();
            frames += 1;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn advance_until_idle_drains_every_frame() {
        let rule = PagerTestRule::new();
        let clock = rule.clock();
        let seen = Rc::new(Cell::new(None));
        let sink = seen.clone();
        let _registration = clock.with_frame_nanos(move |time| sink.set(Some(time)));

        assert_eq!(rule.advance_until_idle(), 1);
        assert_eq!(seen.get(), Some(0));
        assert_eq!(rule.frame_time_nanos(), FRAME_NANOS);
        assert_eq!(rule.advance_until_idle(), 0);
    }

    #[test]
    fn advance_time_rounds_up_to_whole_frames() {
        let rule = PagerTestRule::with_frame_nanos(10_000_000);
        rule.advance_time_by_millis(25);
        assert_eq!(rule.frame_count(), 3);
    }

    #[test]
    fn advance_until_reports_idle_clock() {
        let rule = PagerTestRule::new();
        assert!(rule.advance_until(|| true));
        assert!(!rule.advance_until(|| false));
        assert_eq!(rule.frame_count(), 0);
    }
}
