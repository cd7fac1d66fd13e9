//! Release handling: a decay that carries the pager most of the way, then a
//! snap animation that lands exactly on the committed page.

use loop_pager_animation::{
    animate_decay, AnimationEnd, AnimationType, DecaySpec, FloatDecayAnimationSpec,
};
use loop_pager_core::{FrameClock, MutatePriority};
use loop_pager_foundation::{
    LoopPagerSnapLayoutProvider, ScrollJob, ScrollOutcome, ScrollPhase, ScrollSession,
};
use std::cell::Cell;
use std::rc::Rc;

/// Turns a release velocity into Flinging and Snapping phases.
///
/// Velocities are in pixels per second with the scroll-delta sign: positive
/// moves toward lower pages.
#[derive(Clone)]
pub struct SnapFlingBehavior {
    clock: FrameClock,
    provider: Rc<LoopPagerSnapLayoutProvider>,
    decay: DecaySpec,
    snap_animation: AnimationType,
}

impl SnapFlingBehavior {
    pub fn new(
        clock: FrameClock,
        provider: LoopPagerSnapLayoutProvider,
        decay: DecaySpec,
        snap_animation: AnimationType,
    ) -> Self {
        Self {
            clock,
            provider: Rc::new(provider),
            decay,
            snap_animation,
        }
    }

    pub fn provider(&self) -> &LoopPagerSnapLayoutProvider {
        &self.provider
    }

    /// Settles the pager from a release at `velocity`, taking over `session`.
    ///
    /// A drag session is released first and the fling runs at
    /// [`MutatePriority::Default`]. The returned job completes once the
    /// position rests on the target page, or with [`ScrollOutcome::Cancelled`]
    /// if another session preempts it.
    pub fn perform_fling(&self, session: ScrollSession, velocity: f32) -> ScrollJob {
        if !session.is_active() {
            return ScrollJob::finished(ScrollOutcome::Cancelled);
        }
        let velocity = self.offer_to_parent(&session, velocity);
        let Some(session) = Self::hand_over(session) else {
            return ScrollJob::finished(ScrollOutcome::Cancelled);
        };
        let session = Rc::new(session);
        let job = ScrollJob::new(session.token());

        let decay_offset = self.decay.target_value(0.0, velocity);
        let approach = self
            .provider
            .calculate_approach_offset(&session, velocity, decay_offset);
        if approach == 0.0 {
            self.snap(session, velocity, false, job.clone());
            return job;
        }

        log::debug!("flinging {approach}px at {velocity}px/s");
        session.set_phase(ScrollPhase::Flinging);
        let applied = Cell::new(0.0f32);
        let leftover_velocity = Rc::new(Cell::new(velocity));
        let stepping = session.clone();
        let leftover = leftover_velocity.clone();
        let behavior = self.clone();
        let job_for_end = job.clone();
        let ending = session.clone();
        let animation = animate_decay(
            &self.clock,
            self.decay,
            0.0,
            velocity,
            session.token(),
            move |value, velocity| {
                leftover.set(velocity);
                let reached = value.abs() >= approach.abs();
                let value = if reached { approach } else { value };
                let consumed = stepping.scroll_by(value - applied.get());
                applied.set(applied.get() + consumed);
                !reached && stepping.is_active()
            },
            move |end| match end {
                AnimationEnd::Finished | AnimationEnd::Interrupted if ending.is_active() => {
                    behavior.snap(ending, leftover_velocity.get(), true, job_for_end);
                }
                _ => {
                    ending.abandon();
                    job_for_end.complete(ScrollOutcome::Cancelled);
                }
            },
        );
        job.set_animation(animation);
        job
    }

    /// Runs the final snap. After an approach the target is already
    /// committed; otherwise it is chosen from `velocity` now.
    fn snap(&self, session: Rc<ScrollSession>, velocity: f32, approached: bool, job: ScrollJob) {
        let state = session.state().clone();
        let page = if approached {
            state.target_page()
        } else {
            self.provider.choose_snap_target(&session, velocity).page
        };
        let offset = self.provider.offset_to_page(page);
        log::debug!("snapping to page {page} ({offset}px)");
        session.set_phase(ScrollPhase::Snapping);

        let finishing = session.clone();
        let job_for_end = job.clone();
        let animation = session.animate_by(
            &self.clock,
            offset,
            self.snap_animation,
            velocity,
            move |end| match end {
                AnimationEnd::Finished if finishing.is_active() => {
                    finishing.snap_to_page(page);
                    finishing.release();
                    job_for_end.complete(ScrollOutcome::Completed);
                }
                _ => {
                    finishing.abandon();
                    job_for_end.complete(ScrollOutcome::Cancelled);
                }
            },
        );
        job.set_animation(animation);
    }

    /// Trades a drag session for a `Default` one, so programmatic scrolls can
    /// preempt the fling while a new drag still does.
    fn hand_over(session: ScrollSession) -> Option<ScrollSession> {
        if session.priority() != MutatePriority::UserInput {
            return Some(session);
        }
        let state = session.state().clone();
        session.release();
        drop(session);
        state.scroll(MutatePriority::Default)
    }

    /// Lets the nested scroll parent take part of the release velocity.
    fn offer_to_parent(&self, session: &ScrollSession, velocity: f32) -> f32 {
        let Some(parent) = session.state().nested_scroll_parent() else {
            return velocity;
        };
        let consumed = parent.on_pre_fling(velocity);
        let consumed = if velocity >= 0.0 {
            consumed.clamp(0.0, velocity)
        } else {
            consumed.clamp(velocity, 0.0)
        };
        velocity - consumed
    }
}
