use super::*;
use crate::animation::{AnimationSpec, AnimationType, CubicBezierEasing, Easing, SpringSpec};
use crate::decay_spec::{ExponentialDecaySpec, FloatDecayAnimationSpec};

fn pump(clock: &FrameClock, frame_nanos: u64, max_frames: usize) -> usize {
    let mut frames = 0;
    let mut time = 0;
    while clock.has_frame_callbacks() && frames < max_frames {
        clock.drain_frame_callbacks(time);
        time += frame_nanos;
        frames += 1;
    }
    frames
}

#[test]
fn linear_tween_interpolates_and_lands_on_target() {
    let animation = TargetBasedAnimation::new(
        AnimationType::Tween(AnimationSpec::linear(100)),
        0.0,
        200.0,
        0.0,
    );
    assert_eq!(animation.duration_nanos(), 100_000_000);
    assert_eq!(animation.value_from_nanos(0), 0.0);
    assert!((animation.value_from_nanos(50_000_000) - 100.0).abs() < 1e-3);
    assert_eq!(animation.value_from_nanos(100_000_000), 200.0);
    assert_eq!(animation.value_from_nanos(500_000_000), 200.0);
    assert!((animation.velocity_from_nanos(50_000_000) - 2000.0).abs() < 1.0);
}

#[test]
fn tween_delay_holds_initial_value() {
    let spec = AnimationSpec::linear(100).with_delay(50);
    let animation = TargetBasedAnimation::new(spec.into(), 10.0, 20.0, 0.0);
    assert_eq!(animation.duration_nanos(), 150_000_000);
    assert_eq!(animation.value_from_nanos(40_000_000), 10.0);
    assert!((animation.value_from_nanos(100_000_000) - 15.0).abs() < 1e-3);
}

#[test]
fn easing_curves_are_pinned_at_the_ends() {
    let curves = [
        Easing::LinearEasing,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::FastOutSlowInEasing,
        Easing::LinearOutSlowInEasing,
        Easing::FastOutLinearEasing,
        Easing::CubicBezier(CubicBezierEasing::new(0.3, 0.0, 0.7, 1.0)),
    ];
    for curve in curves {
        assert_eq!(curve.transform(0.0), 0.0, "{curve:?}");
        assert_eq!(curve.transform(1.0), 1.0, "{curve:?}");
    }
}

#[test]
fn fast_out_slow_in_is_monotonic_and_front_loaded() {
    let easing = Easing::FastOutSlowInEasing;
    let mut previous = 0.0;
    for step in 1..=50 {
        let value = easing.transform(step as f32 / 50.0);
        assert!(value >= previous - 1e-5);
        previous = value;
    }
    assert!(easing.transform(0.5) > 0.5);
}

#[test]
fn critically_damped_spring_settles_without_overshoot() {
    let animation = TargetBasedAnimation::new(SpringSpec::default().into(), 0.0, 500.0, 0.0);
    assert!(animation.duration_nanos() > 0);
    let mut play = 0;
    while play < animation.duration_nanos() {
        let value = animation.value_from_nanos(play);
        assert!(value <= 500.0 + 0.01, "overshot to {value}");
        play += 4_000_000;
    }
    assert_eq!(animation.value_from_nanos(animation.duration_nanos()), 500.0);
}

#[test]
fn bouncy_spring_overshoots_its_target() {
    let animation = TargetBasedAnimation::new(SpringSpec::bouncy().into(), 0.0, 100.0, 0.0);
    let peak = (0..animation.duration_nanos() / 1_000_000)
        .map(|millis| animation.value_from_nanos(millis * 1_000_000))
        .fold(f32::MIN, f32::max);
    assert!(peak > 100.0);
}

#[test]
fn spring_starts_with_the_given_velocity() {
    let animation = TargetBasedAnimation::new(SpringSpec::default().into(), 0.0, 100.0, -800.0);
    assert!((animation.velocity_from_nanos(0) - -800.0).abs() < 1.0);
    assert!((animation.value_from_nanos(0) - 0.0).abs() < 1e-4);
}

#[test]
fn runner_steps_every_frame_and_finishes() {
    let clock = FrameClock::new();
    let values = Rc::new(RefCell::new(Vec::new()));
    let ended = Rc::new(Cell::new(None));

    let values_clone = values.clone();
    let ended_clone = ended.clone();
    let job = animate_to(
        &clock,
        TargetBasedAnimation::new(AnimationSpec::linear(100).into(), 0.0, 1.0, 0.0),
        CancellationToken::new(),
        move |value, _| {
            values_clone.borrow_mut().push(value);
            true
        },
        move |end| ended_clone.set(Some(end)),
    );
    assert!(job.is_running());

    pump(&clock, 16_000_000, 100);

    assert_eq!(ended.get(), Some(AnimationEnd::Finished));
    assert!(!job.is_running());
    let values = values.borrow();
    assert_eq!(values.first().copied(), Some(0.0));
    assert_eq!(values.last().copied(), Some(1.0));
    assert!(values.windows(2).all(|pair| pair[1] >= pair[0]));
}

#[test]
fn cancelled_token_stops_at_next_frame() {
    let clock = FrameClock::new();
    let token = CancellationToken::new();
    let steps = Rc::new(Cell::new(0));
    let ended = Rc::new(Cell::new(None));

    let steps_clone = steps.clone();
    let ended_clone = ended.clone();
    let _job = animate_to(
        &clock,
        TargetBasedAnimation::new(AnimationSpec::linear(1000).into(), 0.0, 1.0, 0.0),
        token.clone(),
        move |_, _| {
            steps_clone.set(steps_clone.get() + 1);
            true
        },
        move |end| ended_clone.set(Some(end)),
    );

    clock.drain_frame_callbacks(0);
    clock.drain_frame_callbacks(16_000_000);
    assert_eq!(steps.get(), 2);

    token.cancel();
    clock.drain_frame_callbacks(32_000_000);
    assert_eq!(steps.get(), 2);
    assert_eq!(ended.get(), Some(AnimationEnd::Cancelled));
    assert!(!clock.has_frame_callbacks());
}

#[test]
fn step_returning_false_interrupts() {
    let clock = FrameClock::new();
    let ended = Rc::new(Cell::new(None));
    let ended_clone = ended.clone();
    let _job = animate_to(
        &clock,
        TargetBasedAnimation::new(AnimationSpec::linear(1000).into(), 0.0, 1.0, 0.0),
        CancellationToken::new(),
        |_, _| false,
        move |end| ended_clone.set(Some(end)),
    );
    clock.drain_frame_callbacks(0);
    assert_eq!(ended.get(), Some(AnimationEnd::Interrupted));
}

#[test]
fn job_cancel_reports_immediately() {
    let clock = FrameClock::new();
    let ended = Rc::new(Cell::new(None));
    let ended_clone = ended.clone();
    let job = animate_to(
        &clock,
        TargetBasedAnimation::new(AnimationSpec::default().into(), 0.0, 1.0, 0.0),
        CancellationToken::new(),
        |_, _| true,
        move |end| ended_clone.set(Some(end)),
    );
    job.cancel();
    assert_eq!(ended.get(), Some(AnimationEnd::Cancelled));
    assert!(!clock.has_frame_callbacks());
}

#[test]
fn pre_cancelled_token_never_steps() {
    let clock = FrameClock::new();
    let token = CancellationToken::new();
    token.cancel();
    let ended = Rc::new(Cell::new(None));
    let ended_clone = ended.clone();
    let job = animate_to(
        &clock,
        TargetBasedAnimation::new(AnimationSpec::default().into(), 0.0, 1.0, 0.0),
        token,
        |_, _| panic!("must not step"),
        move |end| ended_clone.set(Some(end)),
    );
    assert!(!job.is_running());
    assert_eq!(ended.get(), Some(AnimationEnd::Cancelled));
}

#[test]
fn decay_runner_comes_to_rest_near_target() {
    let clock = FrameClock::new();
    let spec = ExponentialDecaySpec::default();
    let target = spec.target_value(0.0, 1500.0);
    let last = Rc::new(Cell::new(0.0f32));
    let ended = Rc::new(Cell::new(None));

    let last_clone = last.clone();
    let ended_clone = ended.clone();
    let _job = animate_decay(
        &clock,
        spec,
        0.0,
        1500.0,
        CancellationToken::new(),
        move |value, _| {
            last_clone.set(value);
            true
        },
        move |end| ended_clone.set(Some(end)),
    );

    pump(&clock, 16_000_000, 1000);

    assert_eq!(ended.get(), Some(AnimationEnd::Finished));
    assert!((last.get() - target).abs() < 1.0, "{} vs {target}", last.get());
}
