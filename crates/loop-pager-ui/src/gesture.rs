//! Drag gesture handling along the pager's main axis.

use crate::fling::SnapFlingBehavior;
use loop_pager_core::MutatePriority;
use loop_pager_foundation::{
    DragVelocityTracker, LoopPagerState, ScrollJob, ScrollOutcome, ScrollSession,
};
use web_time::Instant;

/// Feeds pointer drags into a [`LoopPagerState`] and hands releases to the
/// fling behavior.
///
/// Deltas are main-axis pixels with the scroll-delta sign: a finger moving
/// toward the end edge produces a positive delta.
pub struct PagerGestureHandler {
    state: LoopPagerState,
    fling: SnapFlingBehavior,
    tracker: DragVelocityTracker,
    session: Option<ScrollSession>,
    drag_origin: Option<Instant>,
    user_scroll_enabled: bool,
    max_fling_velocity: f32,
}

impl PagerGestureHandler {
    pub fn new(
        state: LoopPagerState,
        fling: SnapFlingBehavior,
        user_scroll_enabled: bool,
        max_fling_velocity: f32,
    ) -> Self {
        Self {
            state,
            fling,
            tracker: DragVelocityTracker::new(),
            session: None,
            drag_origin: None,
            user_scroll_enabled,
            max_fling_velocity,
        }
    }

    pub fn fling_behavior(&self) -> &SnapFlingBehavior {
        &self.fling
    }

    pub fn user_scroll_enabled(&self) -> bool {
        self.user_scroll_enabled
    }

    /// Disabling drops a drag in progress where it is, without a fling.
    pub fn set_user_scroll_enabled(&mut self, enabled: bool) {
        self.user_scroll_enabled = enabled;
        if !enabled {
            if let Some(session) = self.session.take() {
                session.abandon();
            }
            self.tracker.reset();
        }
    }

    /// True while a drag owns the pager.
    pub fn is_dragging(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.is_active())
    }

    /// Starts a drag, preempting any running animation. Returns false when
    /// user scrolling is disabled.
    pub fn drag_start(&mut self, time: Instant) -> bool {
        if !self.user_scroll_enabled {
            return false;
        }
        self.session = self.state.scroll(MutatePriority::UserInput);
        self.tracker.reset();
        self.drag_origin = Some(time);
        self.tracker.add_position(0, 0.0);
        self.session.is_some()
    }

    /// Applies a drag delta and returns the consumed pixels. Starts a drag
    /// implicitly when none is active.
    pub fn drag_by(&mut self, delta: f32, time: Instant) -> f32 {
        if !self.is_dragging() && !self.drag_start(time) {
            return 0.0;
        }
        let time_ms = self.elapsed_millis(time);
        self.tracker.add_delta(time_ms, delta);
        match &self.session {
            Some(session) => session.scroll_by(delta),
            None => 0.0,
        }
    }

    /// Ends the drag with the velocity estimated from the tracked deltas.
    pub fn release(&mut self) -> ScrollJob {
        let velocity = self.tracker.velocity_with_max(self.max_fling_velocity);
        self.release_with_velocity(velocity)
    }

    /// Ends the drag with an explicit velocity in px/s. Without a drag in
    /// progress the fling opens its own session, which a drag or a
    /// programmatic scroll can preempt.
    pub fn release_with_velocity(&mut self, velocity: f32) -> ScrollJob {
        self.tracker.reset();
        self.drag_origin = None;
        if !self.user_scroll_enabled {
            return ScrollJob::finished(ScrollOutcome::Cancelled);
        }
        let session = self
            .session
            .take()
            .filter(|session| session.is_active())
            .or_else(|| self.state.scroll(MutatePriority::Default));
        match session {
            Some(session) => {
                log::debug!("drag released at {velocity}px/s from page {}", self.state.page());
                self.fling.perform_fling(session, velocity)
            }
            None => ScrollJob::finished(ScrollOutcome::Cancelled),
        }
    }

    fn elapsed_millis(&self, time: Instant) -> i64 {
        self.drag_origin
            .map(|origin| time.saturating_duration_since(origin).as_millis() as i64)
            .unwrap_or(0)
    }
}
