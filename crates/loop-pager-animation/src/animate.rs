//! Frame-driven runners for target and decay animations.
//!
//! A runner samples its curve once per frame from the [`FrameClock`], hands
//! the value to `on_step`, and reschedules itself until the curve finishes,
//! the step callback asks to stop, or the cancellation token flips. The token
//! is only consulted at frame boundaries.

use crate::animation::TargetBasedAnimation;
use crate::decay_spec::FloatDecayAnimationSpec;
use loop_pager_core::{CancellationToken, FrameCallbackRegistration, FrameClock};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// How a runner stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEnd {
    /// The curve reached its end.
    Finished,
    /// `on_step` returned `false`.
    Interrupted,
    /// The token was cancelled or the job was cancelled directly.
    Cancelled,
}

trait FrameCurve {
    fn value(&self, play_time_nanos: u64) -> f32;
    fn velocity(&self, play_time_nanos: u64) -> f32;
    fn is_finished(&self, play_time_nanos: u64, velocity: f32) -> bool;
}

impl FrameCurve for TargetBasedAnimation {
    fn value(&self, play_time_nanos: u64) -> f32 {
        self.value_from_nanos(play_time_nanos)
    }

    fn velocity(&self, play_time_nanos: u64) -> f32 {
        self.velocity_from_nanos(play_time_nanos)
    }

    fn is_finished(&self, play_time_nanos: u64, _velocity: f32) -> bool {
        self.is_finished_from_nanos(play_time_nanos)
    }
}

struct DecayCurve<D> {
    spec: D,
    initial_value: f32,
    initial_velocity: f32,
    duration_nanos: u64,
}

impl<D: FloatDecayAnimationSpec> FrameCurve for DecayCurve<D> {
    fn value(&self, play_time_nanos: u64) -> f32 {
        self.spec
            .value_from_nanos(play_time_nanos, self.initial_value, self.initial_velocity)
    }

    fn velocity(&self, play_time_nanos: u64) -> f32 {
        self.spec
            .velocity_from_nanos(play_time_nanos, self.initial_value, self.initial_velocity)
    }

    fn is_finished(&self, play_time_nanos: u64, velocity: f32) -> bool {
        play_time_nanos >= self.duration_nanos
            || velocity.abs() < self.spec.abs_velocity_threshold()
    }
}

type StepFn = Box<dyn FnMut(f32, f32) -> bool + 'static>;
type EndFn = Box<dyn FnOnce(AnimationEnd) + 'static>;

struct RunnerState {
    curve: Box<dyn FrameCurve>,
    token: CancellationToken,
    start_frame_nanos: Cell<Option<u64>>,
    running: Cell<bool>,
    registration: RefCell<Option<FrameCallbackRegistration>>,
    on_step: RefCell<StepFn>,
    on_end: RefCell<Option<EndFn>>,
}

impl RunnerState {
    fn finish(&self, end: AnimationEnd) {
        if !self.running.replace(false) {
            return;
        }
        self.registration.borrow_mut().take();
        let on_end = self.on_end.borrow_mut().take();
        log::trace!("animation ended: {end:?}");
        if let Some(on_end) = on_end {
            on_end(end);
        }
    }
}

fn schedule_next_frame(state: Rc<RunnerState>, clock: FrameClock) {
    let state_for_frame = state.clone();
    let clock_for_frame = clock.clone();
    let registration = clock.with_frame_nanos(move |frame_time_nanos| {
        let state = state_for_frame;
        if !state.running.get() {
            return;
        }
        if state.token.is_cancelled() {
            state.finish(AnimationEnd::Cancelled);
            return;
        }

        let start = match state.start_frame_nanos.get() {
            Some(start) => start,
            None => {
                state.start_frame_nanos.set(Some(frame_time_nanos));
                frame_time_nanos
            }
        };
        let play_time_nanos = frame_time_nanos.saturating_sub(start);
        let value = state.curve.value(play_time_nanos);
        let velocity = state.curve.velocity(play_time_nanos);
        let finished = state.curve.is_finished(play_time_nanos, velocity);

        let keep_going = {
            let mut on_step = state.on_step.borrow_mut();
            (*on_step)(value, velocity)
        };
        if !state.running.get() {
            // Cancelled from inside the step.
            return;
        }
        if !keep_going {
            state.finish(AnimationEnd::Interrupted);
        } else if finished {
            state.finish(AnimationEnd::Finished);
        } else {
            schedule_next_frame(state, clock_for_frame);
        }
    });
    *state.registration.borrow_mut() = Some(registration);
}

fn start_runner(
    clock: &FrameClock,
    curve: Box<dyn FrameCurve>,
    token: CancellationToken,
    on_step: StepFn,
    on_end: EndFn,
) -> AnimationJob {
    let state = Rc::new(RunnerState {
        curve,
        token,
        start_frame_nanos: Cell::new(None),
        running: Cell::new(true),
        registration: RefCell::new(None),
        on_step: RefCell::new(on_step),
        on_end: RefCell::new(Some(on_end)),
    });
    if state.token.is_cancelled() {
        state.finish(AnimationEnd::Cancelled);
    } else {
        schedule_next_frame(state.clone(), clock.clone());
    }
    AnimationJob { state }
}

/// Animates along `animation`, calling `on_step(value, velocity)` every frame.
pub fn animate_to(
    clock: &FrameClock,
    animation: TargetBasedAnimation,
    token: CancellationToken,
    on_step: impl FnMut(f32, f32) -> bool + 'static,
    on_end: impl FnOnce(AnimationEnd) + 'static,
) -> AnimationJob {
    start_runner(
        clock,
        Box::new(animation),
        token,
        Box::new(on_step),
        Box::new(on_end),
    )
}

/// Decays from `initial_value` with `initial_velocity` until the spec comes to rest.
pub fn animate_decay<D>(
    clock: &FrameClock,
    spec: D,
    initial_value: f32,
    initial_velocity: f32,
    token: CancellationToken,
    on_step: impl FnMut(f32, f32) -> bool + 'static,
    on_end: impl FnOnce(AnimationEnd) + 'static,
) -> AnimationJob
where
    D: FloatDecayAnimationSpec + 'static,
{
    let duration_nanos = spec.duration_nanos(initial_value, initial_velocity);
    let curve = DecayCurve {
        spec,
        initial_value,
        initial_velocity,
        duration_nanos,
    };
    start_runner(
        clock,
        Box::new(curve),
        token,
        Box::new(on_step),
        Box::new(on_end),
    )
}

/// Handle to a running animation.
#[derive(Clone)]
pub struct AnimationJob {
    state: Rc<RunnerState>,
}

impl AnimationJob {
    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    /// Stops the animation now and reports [`AnimationEnd::Cancelled`].
    pub fn cancel(&self) {
        self.state.token.cancel();
        self.state.finish(AnimationEnd::Cancelled);
    }
}

impl fmt::Debug for AnimationJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationJob")
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
