//! Animation curves and frame-driven runners used by the loop pager.

mod animate;
mod animation;
mod decay_spec;

pub use animate::{animate_decay, animate_to, AnimationEnd, AnimationJob};
pub use animation::{
    AnimationSpec, AnimationType, CubicBezierEasing, Easing, SpringSpec, TargetBasedAnimation,
};
pub use decay_spec::{
    fling_spline, DecaySpec, ExponentialDecaySpec, FlingCalculator, FloatDecayAnimationSpec,
    SplineBasedDecaySpec, SplineSample,
};
