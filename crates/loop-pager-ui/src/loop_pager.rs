//! The pager as a host embeds it: state, configuration, renderer and gestures
//! behind one handle.

use crate::config::LoopPagerConfig;
use crate::constraints::Constraints;
use crate::fling::SnapFlingBehavior;
use crate::gesture::PagerGestureHandler;
use crate::host::PagerLayoutHost;
use crate::measure::{measure_loop_pager, LoopPagerMeasureResult};
use loop_pager_animation::AnimationType;
use loop_pager_core::FrameClock;
use loop_pager_foundation::{
    LoopPagerItemProvider, LoopPagerSnapLayoutProvider, LoopPagerState, Orientation, PagerError,
    ScrollJob,
};
use web_time::Instant;

type RenderFn<E> = Box<dyn FnMut(usize) -> E>;

/// An infinitely looping pager that renders elements of type `E`.
///
/// The renderer is called with a physical page in `0..page_count` for every
/// visible slot on each [`layout`](Self::layout) pass.
pub struct LoopPager<E> {
    state: LoopPagerState,
    provider: LoopPagerItemProvider,
    config: LoopPagerConfig,
    render: RenderFn<E>,
    gestures: PagerGestureHandler,
    clock: FrameClock,
}

impl<E> LoopPager<E> {
    pub fn horizontal(
        state: LoopPagerState,
        config: LoopPagerConfig,
        clock: FrameClock,
        render: impl FnMut(usize) -> E + 'static,
    ) -> Result<Self, PagerError> {
        Self::new(state, config.with_orientation(Orientation::Horizontal), clock, render)
    }

    pub fn vertical(
        state: LoopPagerState,
        config: LoopPagerConfig,
        clock: FrameClock,
        render: impl FnMut(usize) -> E + 'static,
    ) -> Result<Self, PagerError> {
        Self::new(state, config.with_orientation(Orientation::Vertical), clock, render)
    }

    fn new(
        state: LoopPagerState,
        config: LoopPagerConfig,
        clock: FrameClock,
        render: impl FnMut(usize) -> E + 'static,
    ) -> Result<Self, PagerError> {
        config.validate()?;
        let provider = LoopPagerItemProvider::new(state.page_count())?;
        let gestures = Self::gesture_handler(&state, &config, &clock);
        Ok(Self {
            state,
            provider,
            config,
            render: Box::new(render),
            gestures,
            clock,
        })
    }

    fn gesture_handler(
        state: &LoopPagerState,
        config: &LoopPagerConfig,
        clock: &FrameClock,
    ) -> PagerGestureHandler {
        let snap_layout = LoopPagerSnapLayoutProvider::new(
            state.clone(),
            config.snap_distance,
            config.velocity_threshold,
        );
        let fling = SnapFlingBehavior::new(
            clock.clone(),
            snap_layout,
            config.decay,
            config.snap_animation,
        );
        PagerGestureHandler::new(
            state.clone(),
            fling,
            config.user_scroll_enabled,
            config.max_fling_velocity,
        )
    }

    pub fn state(&self) -> &LoopPagerState {
        &self.state
    }

    pub fn config(&self) -> &LoopPagerConfig {
        &self.config
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn item_provider(&self) -> &LoopPagerItemProvider {
        &self.provider
    }

    /// Measures, renders every visible slot and hands it to `host`.
    pub fn layout(
        &mut self,
        constraints: Constraints,
        host: &mut impl PagerLayoutHost<E>,
    ) -> Result<LoopPagerMeasureResult, PagerError> {
        let result = measure_loop_pager(&self.state, &mut self.provider, &self.config, constraints)?;
        for placement in &result.placements {
            let element = (self.render)(placement.slot.physical_page);
            host.place_page(placement, element);
        }
        Ok(result)
    }

    pub fn drag_start(&mut self, time: Instant) -> bool {
        self.gestures.drag_start(time)
    }

    pub fn drag_by(&mut self, delta: f32, time: Instant) -> f32 {
        self.gestures.drag_by(delta, time)
    }

    pub fn release(&mut self) -> ScrollJob {
        self.gestures.release()
    }

    pub fn release_with_velocity(&mut self, velocity: f32) -> ScrollJob {
        self.gestures.release_with_velocity(velocity)
    }

    pub fn is_dragging(&self) -> bool {
        self.gestures.is_dragging()
    }

    pub fn set_user_scroll_enabled(&mut self, enabled: bool) {
        self.config.user_scroll_enabled = enabled;
        self.gestures.set_user_scroll_enabled(enabled);
    }

    pub fn scroll_to_page(&self, page: i32) {
        self.state.scroll_to_page(page);
    }

    /// Animates to `page` with the configured snap animation.
    pub fn animate_scroll_to_page(&self, page: i32) -> ScrollJob {
        self.animate_scroll_to_page_with(page, self.config.snap_animation)
    }

    pub fn animate_scroll_to_page_with(&self, page: i32, spec: AnimationType) -> ScrollJob {
        self.state.animate_scroll_to_page(&self.clock, page, spec)
    }
}
