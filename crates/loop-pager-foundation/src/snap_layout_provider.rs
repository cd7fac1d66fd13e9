//! Release-time decisions: which page a fling lands on and how much of the
//! distance the decay animation covers before the snap takes over.
//!
//! All pixel offsets returned here use the scroll-delta sign convention of
//! [`LoopPagerState`]: feeding the offset to [`ScrollSession::scroll_by`]
//! moves the position toward the chosen page.

use crate::pager_state::{LoopPagerState, ScrollSession};
use crate::snap_distance::{PagerSnapDistance, SnapDistance};

/// Release speed (px/s) below which a fling snaps to the nearest page.
pub const DEFAULT_VELOCITY_THRESHOLD: f32 = 400.0;

/// Page chosen for the final snap and its distance from the position in pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub page: i32,
    pub offset: f32,
}

pub struct LoopPagerSnapLayoutProvider<D: PagerSnapDistance = SnapDistance> {
    state: LoopPagerState,
    snap_distance: D,
    velocity_threshold: f32,
}

impl<D: PagerSnapDistance> LoopPagerSnapLayoutProvider<D> {
    pub fn new(state: LoopPagerState, snap_distance: D, velocity_threshold: f32) -> Self {
        Self {
            state,
            snap_distance,
            velocity_threshold: velocity_threshold.abs(),
        }
    }

    pub fn state(&self) -> &LoopPagerState {
        &self.state
    }

    pub fn snap_distance(&self) -> &D {
        &self.snap_distance
    }

    pub fn velocity_threshold(&self) -> f32 {
        self.velocity_threshold
    }

    /// Picks the final page and commits it as the target through `session`.
    ///
    /// Slow releases land on the nearest page; fast ones advance to the
    /// neighbour in the direction of motion, so a flick always moves at
    /// least one page.
    pub fn choose_snap_target(&self, session: &ScrollSession, velocity: f32) -> SnapTarget {
        let position = self.state.page();
        let page = if velocity.abs() < self.velocity_threshold {
            position.round()
        } else if velocity > 0.0 {
            position.floor()
        } else {
            position.ceil()
        } as i32;
        session.set_target_page(page);
        SnapTarget {
            page,
            offset: page as f32 - position,
        }
    }

    /// Pixel delta that lands exactly on the chosen snap target. Zero before
    /// the first measurement.
    pub fn calculate_snap_offset(&self, session: &ScrollSession, velocity: f32) -> f32 {
        if !self.state.layout_info().is_measured() {
            return 0.0;
        }
        let target = self.choose_snap_target(session, velocity);
        self.offset_to_page(target.page)
    }

    /// Pixel delta the decay animation may cover before handing over to the
    /// snap.
    ///
    /// `decay_offset` is the distance the unconstrained decay would travel.
    /// The landing page it suggests is bounded by the snap distance policy and
    /// committed as the target; the returned offset stops one page short of
    /// it. Zero means the snap can start right away.
    pub fn calculate_approach_offset(
        &self,
        session: &ScrollSession,
        velocity: f32,
        decay_offset: f32,
    ) -> f32 {
        let Some(layout) = self.state.layout_info().as_measured().copied() else {
            return 0.0;
        };
        if velocity.abs() < self.velocity_threshold {
            return 0.0;
        }
        let interval = layout.page_interval() as f32;
        let position = self.state.page();
        let candidate = (position - decay_offset / interval).round() as i32;
        let bounded = self.snap_distance.calculate_target_page(
            self.state.current_page(),
            candidate,
            velocity,
            layout.page_size,
            layout.page_spacing,
        );
        let distance = bounded as f32 - position;
        if distance.abs() <= 1.0 {
            return 0.0;
        }

        let approach = distance - distance.signum();
        let offset = -approach * interval;
        session.set_target_page(bounded);
        log::debug!(
            "fling from page {position} toward {bounded} (suggested {candidate}), approach {offset}px"
        );
        if offset.signum() != velocity.signum() {
            return 0.0;
        }
        offset
    }

    /// Pixel delta from the current position to `page`. Zero before the
    /// first measurement.
    pub fn offset_to_page(&self, page: i32) -> f32 {
        match self.state.layout_info().as_measured() {
            Some(layout) => -(page as f32 - self.state.page()) * layout.page_interval() as f32,
            None => 0.0,
        }
    }
}
