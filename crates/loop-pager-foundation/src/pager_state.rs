//! Scroll position state machine of the looping pager.
//!
//! Position is measured in pages, is fractional while moving and is not
//! bounded in either direction. Pixel deltas are converted with the measured
//! page interval: `position -= delta / page_interval`, so a positive delta
//! (content following a finger that moves toward the end edge) reveals lower
//! page indices, and a negative delta reveals higher ones.
//!
//! Every mutation goes through a [`ScrollSession`] issued by the state's
//! [`MutatorMutex`]. Starting a session preempts the current one when its
//! priority is at least as high; a drag (`UserInput`) therefore always wins
//! over programmatic scrolls and flings (`Default`).

use crate::error::PagerError;
use crate::layout_info::{LoopPagerLayoutInfo, MeasuredLayout};
use crate::nested_scroll::{NestedScrollConnection, NestedScrollSource};
use loop_pager_animation::{
    animate_to, AnimationEnd, AnimationJob, AnimationType, TargetBasedAnimation,
};
use loop_pager_core::{CancellationToken, FrameClock, MutatePriority, MutatorGuard, MutatorMutex};
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::RangeInclusive;
use std::rc::{Rc, Weak};

/// Distance in pages under which position counts as resting on a page.
pub const SETTLE_EPSILON: f32 = 1e-6;

/// Returned by listener registration, used to unregister.
pub type ListenerId = u64;

/// What currently owns the scroll position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScrollPhase {
    #[default]
    Idle,
    Dragging,
    Flinging,
    Snapping,
    /// Programmatic `animate_scroll_to_page`.
    Animating,
}

/// Final result of a scroll job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollOutcome {
    /// Position landed exactly on the target page.
    Completed,
    /// The job was preempted, refused or cancelled before landing.
    Cancelled,
}

struct PagerStateInner {
    page_count: Cell<usize>,
    position: Cell<f32>,
    target_page: Cell<i32>,
    settled_page: Cell<i32>,
    layout_info: Cell<LoopPagerLayoutInfo>,
    phase: Cell<ScrollPhase>,
    mutator: MutatorMutex,
    nested_scroll_parent: RefCell<Option<Rc<dyn NestedScrollConnection>>>,
    invalidate_callbacks: RefCell<FxHashMap<ListenerId, Rc<dyn Fn()>>>,
    settled_listeners: RefCell<FxHashMap<ListenerId, Rc<dyn Fn(i32)>>>,
    next_listener_id: Cell<ListenerId>,
}

/// Shared handle to the pager's scroll state.
///
/// Cloning is cheap and every clone observes the same state.
#[derive(Clone)]
pub struct LoopPagerState {
    inner: Rc<PagerStateInner>,
}

impl LoopPagerState {
    pub fn new(page_count: usize, initial_page: i32) -> Result<Self, PagerError> {
        if page_count == 0 {
            return Err(PagerError::InvalidPageCount { page_count });
        }
        Ok(Self {
            inner: Rc::new(PagerStateInner {
                page_count: Cell::new(page_count),
                position: Cell::new(initial_page as f32),
                target_page: Cell::new(initial_page),
                settled_page: Cell::new(initial_page),
                layout_info: Cell::new(LoopPagerLayoutInfo::Unmeasured),
                phase: Cell::new(ScrollPhase::Idle),
                mutator: MutatorMutex::new(),
                nested_scroll_parent: RefCell::new(None),
                invalidate_callbacks: RefCell::new(FxHashMap::default()),
                settled_listeners: RefCell::new(FxHashMap::default()),
                next_listener_id: Cell::new(1),
            }),
        })
    }

    pub fn page_count(&self) -> usize {
        self.inner.page_count.get()
    }

    pub fn set_page_count(&self, page_count: usize) -> Result<(), PagerError> {
        if page_count == 0 {
            return Err(PagerError::InvalidPageCount { page_count });
        }
        if self.inner.page_count.replace(page_count) != page_count {
            log::debug!("page count changed to {page_count}");
            self.notify_invalidate();
        }
        Ok(())
    }

    /// Continuous scroll position in pages.
    pub fn page(&self) -> f32 {
        self.inner.position.get()
    }

    /// `round(position)`, ties away from zero. May be negative or `>= page_count`.
    pub fn current_page(&self) -> i32 {
        self.page().round() as i32
    }

    /// Signed distance of the position from [`Self::current_page`], in `[-0.5, 0.5]`.
    pub fn current_page_offset_fraction(&self) -> f32 {
        self.page() - self.current_page() as f32
    }

    /// Page the state is committed to landing on.
    pub fn target_page(&self) -> i32 {
        self.inner.target_page.get()
    }

    /// Last page the position came to rest on.
    pub fn settled_page(&self) -> i32 {
        self.inner.settled_page.get()
    }

    pub fn phase(&self) -> ScrollPhase {
        self.inner.phase.get()
    }

    pub fn is_scroll_in_progress(&self) -> bool {
        self.inner.mutator.is_mutating() || !self.is_at_rest()
    }

    fn is_at_rest(&self) -> bool {
        (self.page() - self.settled_page() as f32).abs() <= SETTLE_EPSILON
    }

    /// Physical page shown for the current page.
    pub fn current_physical_page(&self) -> usize {
        crate::item_provider::physical_page(self.current_page(), self.page_count())
    }

    pub fn can_scroll_forward(&self) -> bool {
        true
    }

    pub fn can_scroll_backward(&self) -> bool {
        true
    }

    pub fn layout_info(&self) -> LoopPagerLayoutInfo {
        self.inner.layout_info.get()
    }

    pub fn require_layout(&self) -> Result<MeasuredLayout, PagerError> {
        self.layout_info().require_measured().copied()
    }

    /// Installs a freshly measured layout and returns the pages to draw.
    ///
    /// The scroll position is preserved across re-measures.
    pub fn on_layout(&self, layout: MeasuredLayout) -> Result<RangeInclusive<i32>, PagerError> {
        let info = LoopPagerLayoutInfo::measured(layout, self.page_count())?;
        if self.inner.layout_info.replace(info) != info {
            log::debug!(
                "layout updated: viewport {} page {} spacing {} padding ({}, {})",
                layout.viewport_size,
                layout.page_size,
                layout.page_spacing,
                layout.before_padding,
                layout.after_padding
            );
        }
        Ok(self.visible_logical_range(&info))
    }

    /// Logical pages intersecting the viewport for `layout`.
    ///
    /// A page whose content has fully scrolled out, leaving only its trailing
    /// spacing in view, is skipped. Unmeasured layouts produce an empty range.
    pub fn visible_logical_range(&self, layout: &LoopPagerLayoutInfo) -> RangeInclusive<i32> {
        #[allow(clippy::reversed_empty_ranges)]
        const EMPTY: RangeInclusive<i32> = 1..=0;

        let Some(layout) = layout.as_measured() else {
            return EMPTY;
        };
        let interval = layout.page_interval();
        if layout.page_size <= 0 || interval <= 0 {
            return EMPTY;
        }
        let interval = interval as f32;
        let start = self.page() - layout.before_padding as f32 / interval;
        let end = start + layout.viewport_size as f32 / interval;

        let start_floor = start.floor();
        let mut lower = start_floor as i32;
        if start - start_floor >= layout.page_size as f32 / interval {
            lower = lower.saturating_add(1);
        }
        let upper = (end.floor() as i32).max(lower);
        lower..=upper
    }

    /// Main-axis pixel offset of `page`'s leading edge from the viewport start.
    pub fn main_axis_offset(&self, page: i32) -> Result<i32, PagerError> {
        let layout = self.require_layout()?;
        let offset = layout.before_padding as f32
            + layout.page_interval() as f32 * (page as f32 - self.page());
        Ok(offset.round() as i32)
    }

    /// Applies a raw drag delta in pixels through a one-shot user-input session.
    ///
    /// Preempts any running animation. Returns the consumed delta, which is
    /// the whole delta once measured and zero before. The phase stays
    /// [`ScrollPhase::Dragging`] until the position rests on the settled page
    /// again or another session takes over.
    pub fn apply_scroll_delta(&self, delta: f32) -> f32 {
        let Some(session) = self.scroll(MutatePriority::UserInput) else {
            return 0.0;
        };
        let consumed = session.scroll_by(delta);
        drop(session);
        if !self.is_at_rest() && self.phase() == ScrollPhase::Idle {
            self.inner.phase.set(ScrollPhase::Dragging);
        }
        consumed
    }

    /// Opens a scroll session, preempting the current owner if `priority`
    /// is at least as high. Returns `None` when refused.
    pub fn scroll(&self, priority: MutatePriority) -> Option<ScrollSession> {
        let guard = self.inner.mutator.try_mutate(priority)?;
        let state = Rc::downgrade(&self.inner);
        guard.on_cancel(move || {
            if let Some(inner) = Weak::upgrade(&state) {
                LoopPagerState { inner }.abandon_target();
            }
        });
        let (phase, source) = match priority {
            MutatePriority::UserInput => (ScrollPhase::Dragging, NestedScrollSource::UserInput),
            MutatePriority::Default | MutatePriority::PreventUserInput => {
                (ScrollPhase::Animating, NestedScrollSource::SideEffect)
            }
        };
        self.inner.phase.set(phase);
        Some(ScrollSession {
            state: self.clone(),
            guard,
            source,
            released: Cell::new(false),
        })
    }

    /// Jumps to `page` without animation, preempting any session.
    pub fn scroll_to_page(&self, page: i32) {
        match self.scroll(MutatePriority::PreventUserInput) {
            Some(session) => session.snap_to_page(page),
            None => log::warn!("scroll_to_page({page}) refused"),
        }
    }

    /// Animates to `page`, committing it as the target right away.
    ///
    /// Jumps immediately when the pager is not measured. When a drag owns the
    /// state the request is refused and the job reports
    /// [`ScrollOutcome::Cancelled`].
    pub fn animate_scroll_to_page(
        &self,
        clock: &FrameClock,
        page: i32,
        spec: AnimationType,
    ) -> ScrollJob {
        let Some(layout) = self.layout_info().as_measured().copied() else {
            log::debug!("animate_scroll_to_page({page}) before measurement, jumping");
            self.scroll_to_page(page);
            return ScrollJob::finished(ScrollOutcome::Completed);
        };
        let Some(session) = self.scroll(MutatePriority::Default) else {
            log::debug!("animate_scroll_to_page({page}) refused during drag");
            return ScrollJob::finished(ScrollOutcome::Cancelled);
        };

        let session = Rc::new(session);
        session.set_target_page(page);
        session.set_phase(ScrollPhase::Animating);
        let offset = -(page as f32 - self.page()) * layout.page_interval() as f32;

        let job = ScrollJob::new(session.token());
        let finishing = session.clone();
        let job_for_end = job.clone();
        let animation = session.animate_by(clock, offset, spec, 0.0, move |end| match end {
            AnimationEnd::Finished => {
                finishing.snap_to_page(page);
                finishing.release();
                job_for_end.complete(ScrollOutcome::Completed);
            }
            AnimationEnd::Interrupted | AnimationEnd::Cancelled => {
                finishing.abandon();
                job_for_end.complete(ScrollOutcome::Cancelled);
            }
        });
        job.set_animation(animation);
        job
    }

    /// Sets the parent that gets first pick of every scroll delta.
    pub fn set_nested_scroll_parent(&self, parent: Option<Rc<dyn NestedScrollConnection>>) {
        *self.inner.nested_scroll_parent.borrow_mut() = parent;
    }

    pub fn nested_scroll_parent(&self) -> Option<Rc<dyn NestedScrollConnection>> {
        self.inner.nested_scroll_parent.borrow().clone()
    }

    /// Registers a callback run whenever the position or page count changes.
    pub fn add_invalidate_callback(&self, callback: impl Fn() + 'static) -> ListenerId {
        let id = self.next_listener_id();
        self.inner
            .invalidate_callbacks
            .borrow_mut()
            .insert(id, Rc::new(callback));
        id
    }

    pub fn remove_invalidate_callback(&self, id: ListenerId) {
        self.inner.invalidate_callbacks.borrow_mut().remove(&id);
    }

    /// Registers a callback run with the new settled page whenever it changes.
    pub fn add_settled_page_listener(&self, listener: impl Fn(i32) + 'static) -> ListenerId {
        let id = self.next_listener_id();
        self.inner
            .settled_listeners
            .borrow_mut()
            .insert(id, Rc::new(listener));
        id
    }

    pub fn remove_settled_page_listener(&self, id: ListenerId) {
        self.inner.settled_listeners.borrow_mut().remove(&id);
    }

    fn next_listener_id(&self) -> ListenerId {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        id
    }

    fn perform_scroll(&self, delta: f32, source: NestedScrollSource) -> f32 {
        let Some(layout) = self.layout_info().as_measured().copied() else {
            return 0.0;
        };
        if delta == 0.0 {
            return 0.0;
        }

        let parent = self.nested_scroll_parent();
        let parent_consumed = parent
            .as_ref()
            .map(|parent| clamp_consumed(parent.on_pre_scroll(delta, source), delta))
            .unwrap_or(0.0);
        let available = delta - parent_consumed;
        if available != 0.0 {
            let position = self.page() - available / layout.page_interval() as f32;
            log::trace!("scroll by {available}px ({source:?}) -> page {position}");
            self.update(Some(position), None);
        }
        if let Some(parent) = parent {
            parent.on_post_scroll(available, 0.0, source);
        }
        delta
    }

    /// Drops a committed target that will no longer be reached.
    fn abandon_target(&self) {
        let current = self.current_page();
        if self.target_page() != current {
            log::debug!(
                "target page {} abandoned at page {}",
                self.target_page(),
                self.page()
            );
        }
        self.update(None, Some(current));
    }

    /// Writes position and target together, then derives the settled page
    /// and notifies observers.
    fn update(&self, position: Option<f32>, target_page: Option<i32>) {
        if let Some(position) = position {
            self.inner.position.set(position);
        }
        if let Some(target_page) = target_page {
            self.inner.target_page.set(target_page);
        }

        let target = self.target_page();
        let settled_changed = (target as f32 - self.page()).abs() < SETTLE_EPSILON
            && self.inner.settled_page.replace(target) != target;

        if position.is_some() {
            self.notify_invalidate();
        }
        if settled_changed {
            log::debug!("settled on page {target}");
            let listeners: Vec<_> = self
                .inner
                .settled_listeners
                .borrow()
                .values()
                .cloned()
                .collect();
            for listener in listeners {
                listener(target);
            }
        }
    }

    fn notify_invalidate(&self) {
        let callbacks: Vec<_> = self
            .inner
            .invalidate_callbacks
            .borrow()
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl fmt::Debug for LoopPagerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopPagerState")
            .field("page_count", &self.page_count())
            .field("page", &self.page())
            .field("target_page", &self.target_page())
            .field("settled_page", &self.settled_page())
            .field("phase", &self.phase())
            .finish()
    }
}

/// Parent consumption can neither exceed nor reverse the offered delta.
fn clamp_consumed(consumed: f32, available: f32) -> f32 {
    if available >= 0.0 {
        consumed.clamp(0.0, available)
    } else {
        consumed.clamp(available, 0.0)
    }
}

/// Exclusive right to move a [`LoopPagerState`].
///
/// Every mutator becomes a no-op once the session is preempted or released.
/// Dropping the session releases it.
pub struct ScrollSession {
    state: LoopPagerState,
    guard: MutatorGuard,
    source: NestedScrollSource,
    released: Cell<bool>,
}

impl ScrollSession {
    pub fn state(&self) -> &LoopPagerState {
        &self.state
    }

    pub fn priority(&self) -> MutatePriority {
        self.guard.priority()
    }

    pub fn source(&self) -> NestedScrollSource {
        self.source
    }

    pub fn token(&self) -> CancellationToken {
        self.guard.token().clone()
    }

    /// True while this session still owns the state.
    pub fn is_active(&self) -> bool {
        !self.released.get() && self.guard.is_owner()
    }

    /// Scrolls by a pixel delta; see the module docs for the sign convention.
    pub fn scroll_by(&self, delta: f32) -> f32 {
        if !self.is_active() {
            return 0.0;
        }
        self.state.perform_scroll(delta, self.source)
    }

    pub fn set_target_page(&self, page: i32) {
        if self.is_active() {
            if self.state.target_page() != page {
                log::debug!("target page -> {page}");
            }
            self.state.update(None, Some(page));
        }
    }

    /// Moves the position exactly onto `page` and makes it the target.
    pub fn snap_to_page(&self, page: i32) {
        if self.is_active() {
            self.state.update(Some(page as f32), Some(page));
        }
    }

    pub fn set_phase(&self, phase: ScrollPhase) {
        if self.is_active() {
            self.state.inner.phase.set(phase);
        }
    }

    /// Runs `hook` if another session preempts this one.
    pub fn on_cancel(&self, hook: impl FnOnce() + 'static) {
        self.guard.on_cancel(hook);
    }

    /// Animates a pixel scroll of `offset` through this session.
    ///
    /// `on_end` runs once when the runner stops. The runner is cancelled
    /// through this session's token when the session is preempted.
    pub fn animate_by(
        self: &Rc<Self>,
        clock: &FrameClock,
        offset: f32,
        spec: AnimationType,
        initial_velocity: f32,
        on_end: impl FnOnce(AnimationEnd) + 'static,
    ) -> AnimationJob {
        let animation = TargetBasedAnimation::new(spec, 0.0, offset, initial_velocity);
        let stepping = self.clone();
        let applied = Cell::new(0.0f32);
        animate_to(
            clock,
            animation,
            self.token(),
            move |value, _velocity| {
                let consumed = stepping.scroll_by(value - applied.get());
                applied.set(applied.get() + consumed);
                stepping.is_active()
            },
            on_end,
        )
    }

    /// Gives up the target (it becomes the current page) and releases.
    pub fn abandon(&self) {
        if self.is_active() {
            self.state.abandon_target();
        }
        self.release();
    }

    /// Returns ownership; the state goes idle if this session still owned it.
    pub fn release(&self) {
        if self.released.replace(true) {
            return;
        }
        if self.guard.release() {
            self.state.inner.phase.set(ScrollPhase::Idle);
        }
    }
}

impl Drop for ScrollSession {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ScrollSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollSession")
            .field("priority", &self.priority())
            .field("source", &self.source)
            .field("active", &self.is_active())
            .finish()
    }
}

type CompletionFn = Box<dyn FnOnce(ScrollOutcome) + 'static>;

#[derive(Default)]
struct ScrollJobInner {
    outcome: Cell<Option<ScrollOutcome>>,
    token: Option<CancellationToken>,
    animation: RefCell<Option<AnimationJob>>,
    on_complete: RefCell<Vec<CompletionFn>>,
}

/// Handle to an animated scroll: programmatic, fling or snap.
#[derive(Clone)]
pub struct ScrollJob {
    inner: Rc<ScrollJobInner>,
}

impl ScrollJob {
    /// A job driven by animations cancelled through `token`.
    pub fn new(token: CancellationToken) -> Self {
        Self {
            inner: Rc::new(ScrollJobInner {
                token: Some(token),
                ..Default::default()
            }),
        }
    }

    /// A job that resolved without animating.
    pub fn finished(outcome: ScrollOutcome) -> Self {
        let job = Self {
            inner: Rc::new(ScrollJobInner::default()),
        };
        job.inner.outcome.set(Some(outcome));
        job
    }

    pub fn outcome(&self) -> Option<ScrollOutcome> {
        self.inner.outcome.get()
    }

    pub fn is_active(&self) -> bool {
        self.outcome().is_none()
    }

    /// Tracks the animation currently driving this job.
    pub fn set_animation(&self, animation: AnimationJob) {
        if self.is_active() && animation.is_running() {
            *self.inner.animation.borrow_mut() = Some(animation);
        }
    }

    /// Resolves the job. Only the first call has an effect.
    pub fn complete(&self, outcome: ScrollOutcome) {
        if self.inner.outcome.get().is_some() {
            return;
        }
        self.inner.outcome.set(Some(outcome));
        self.inner.animation.borrow_mut().take();
        let callbacks = std::mem::take(&mut *self.inner.on_complete.borrow_mut());
        for callback in callbacks {
            callback(outcome);
        }
    }

    /// Runs `callback` on completion, immediately if already complete.
    pub fn on_complete(&self, callback: impl FnOnce(ScrollOutcome) + 'static) {
        match self.outcome() {
            Some(outcome) => callback(outcome),
            None => self.inner.on_complete.borrow_mut().push(Box::new(callback)),
        }
    }

    pub fn cancel(&self) {
        if let Some(token) = &self.inner.token {
            token.cancel();
        }
        let animation = self.inner.animation.borrow_mut().take();
        if let Some(animation) = animation {
            animation.cancel();
        }
        self.complete(ScrollOutcome::Cancelled);
    }
}

impl fmt::Debug for ScrollJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollJob")
            .field("outcome", &self.outcome())
            .finish()
    }
}

/// Persists a pager across restarts as its rounded current page.
///
/// Any fractional in-flight offset is dropped on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopPagerSaver {
    page_count: usize,
}

impl LoopPagerSaver {
    pub fn new(page_count: usize) -> Self {
        Self { page_count }
    }

    pub fn save(&self, state: &LoopPagerState) -> i32 {
        state.current_page()
    }

    pub fn restore(&self, saved: i32) -> Result<LoopPagerState, PagerError> {
        LoopPagerState::new(self.page_count, saved)
    }
}

#[cfg(test)]
#[path = "tests/pager_state_tests.rs"]
mod tests;
