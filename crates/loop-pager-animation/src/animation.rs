//! Target-based animation curves: easing tweens and damped springs.

/// Easing functions mapping a linear fraction in `[0, 1]` to progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    LinearEasing,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Material standard curve.
    FastOutSlowInEasing,
    LinearOutSlowInEasing,
    FastOutLinearEasing,
    /// Arbitrary cubic bezier through `(0, 0)` and `(1, 1)`.
    CubicBezier(CubicBezierEasing),
}

impl Easing {
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::LinearEasing => fraction.clamp(0.0, 1.0),
            Easing::EaseIn => CubicBezierEasing::new(0.42, 0.0, 1.0, 1.0).transform(fraction),
            Easing::EaseOut => CubicBezierEasing::new(0.0, 0.0, 0.58, 1.0).transform(fraction),
            Easing::EaseInOut => CubicBezierEasing::new(0.42, 0.0, 0.58, 1.0).transform(fraction),
            Easing::FastOutSlowInEasing => {
                CubicBezierEasing::new(0.4, 0.0, 0.2, 1.0).transform(fraction)
            }
            Easing::LinearOutSlowInEasing => {
                CubicBezierEasing::new(0.0, 0.0, 0.2, 1.0).transform(fraction)
            }
            Easing::FastOutLinearEasing => {
                CubicBezierEasing::new(0.4, 0.0, 1.0, 1.0).transform(fraction)
            }
            Easing::CubicBezier(curve) => curve.transform(fraction),
        }
    }
}

/// Cubic bezier easing defined by its two control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezierEasing {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezierEasing {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn transform(&self, fraction: f32) -> f32 {
        if fraction <= 0.0 {
            return 0.0;
        }
        if fraction >= 1.0 {
            return 1.0;
        }
        let t = self.solve_parameter(fraction);
        bezier_component(self.y1, self.y2, t)
    }

    /// Finds the curve parameter whose x coordinate equals `x`.
    fn solve_parameter(&self, x: f32) -> f32 {
        let mut t = x;
        for _ in 0..8 {
            let error = bezier_component(self.x1, self.x2, t) - x;
            if error.abs() < 1e-6 {
                return t;
            }
            let slope = bezier_slope(self.x1, self.x2, t);
            if slope.abs() < 1e-6 {
                break;
            }
            t = (t - error / slope).clamp(0.0, 1.0);
        }

        // Newton stalled; bisect instead.
        let (mut low, mut high) = (0.0f32, 1.0f32);
        t = x;
        for _ in 0..24 {
            let error = bezier_component(self.x1, self.x2, t) - x;
            if error.abs() < 1e-6 {
                break;
            }
            if error > 0.0 {
                high = t;
            } else {
                low = t;
            }
            t = 0.5 * (low + high);
        }
        t
    }
}

fn bezier_component(p1: f32, p2: f32, t: f32) -> f32 {
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    let a = 1.0 - c - b;
    ((a * t + b) * t + c) * t
}

fn bezier_slope(p1: f32, p2: f32, t: f32) -> f32 {
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    let a = 1.0 - c - b;
    (3.0 * a * t + 2.0 * b) * t + c
}

/// Duration based tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub duration_millis: u64,
    pub easing: Easing,
    pub delay_millis: u64,
}

impl AnimationSpec {
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
            delay_millis: 0,
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::LinearEasing)
    }

    pub fn with_delay(mut self, delay_millis: u64) -> Self {
        self.delay_millis = delay_millis;
        self
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::FastOutSlowInEasing)
    }
}

/// Damped spring. Thresholds are expressed in the animated value's units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// 1.0 is critically damped, below bounces, above creeps.
    pub damping_ratio: f32,
    pub stiffness: f32,
    pub velocity_threshold: f32,
    pub position_threshold: f32,
}

impl SpringSpec {
    pub const STIFFNESS_MEDIUM: f32 = 1500.0;
    pub const STIFFNESS_HIGH: f32 = 10_000.0;
    pub const STIFFNESS_LOW: f32 = 200.0;

    pub fn default_spring() -> Self {
        Self::new(1.0, Self::STIFFNESS_MEDIUM)
    }

    pub fn bouncy() -> Self {
        Self::new(0.5, Self::STIFFNESS_MEDIUM)
    }

    pub fn stiff() -> Self {
        Self::new(1.0, 3000.0)
    }

    pub fn new(damping_ratio: f32, stiffness: f32) -> Self {
        Self {
            damping_ratio,
            stiffness,
            velocity_threshold: 0.1,
            position_threshold: 0.01,
        }
    }

    /// Displacement from the rest position and velocity after `seconds`.
    fn solve(&self, displacement: f64, velocity: f64, seconds: f64) -> (f64, f64) {
        let zeta = self.damping_ratio.max(0.0) as f64;
        let omega = (self.stiffness.max(f32::EPSILON) as f64).sqrt();
        let t = seconds;

        if zeta > 1.0 {
            let root = omega * (zeta * zeta - 1.0).sqrt();
            let gamma_plus = -zeta * omega + root;
            let gamma_minus = -zeta * omega - root;
            let coeff_b = (gamma_minus * displacement - velocity) / (gamma_minus - gamma_plus);
            let coeff_a = displacement - coeff_b;
            let x = coeff_a * (gamma_minus * t).exp() + coeff_b * (gamma_plus * t).exp();
            let v = coeff_a * gamma_minus * (gamma_minus * t).exp()
                + coeff_b * gamma_plus * (gamma_plus * t).exp();
            (x, v)
        } else if (zeta - 1.0).abs() < f64::EPSILON {
            let coeff_a = displacement;
            let coeff_b = velocity + omega * displacement;
            let decay = (-omega * t).exp();
            let x = (coeff_a + coeff_b * t) * decay;
            let v = coeff_b * decay - omega * x;
            (x, v)
        } else {
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            let cos_coeff = displacement;
            let sin_coeff = (zeta * omega * displacement + velocity) / damped;
            let envelope = (-zeta * omega * t).exp();
            let (sin, cos) = (damped * t).sin_cos();
            let x = envelope * (cos_coeff * cos + sin_coeff * sin);
            let v = -zeta * omega * x + envelope * damped * (sin_coeff * cos - cos_coeff * sin);
            (x, v)
        }
    }

    fn settle_millis(&self, displacement: f64, velocity: f64) -> u64 {
        const MAX_SETTLE_MILLIS: u64 = 10_000;
        let position_threshold = self.position_threshold.abs().max(f32::EPSILON) as f64;
        let velocity_threshold = self.velocity_threshold.abs().max(f32::EPSILON) as f64;
        (0..=MAX_SETTLE_MILLIS)
            .find(|&millis| {
                let (x, v) = self.solve(displacement, velocity, millis as f64 / 1000.0);
                x.abs() < position_threshold && v.abs() < velocity_threshold
            })
            .unwrap_or(MAX_SETTLE_MILLIS)
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::default_spring()
    }
}

/// Curve used to reach a known target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationType {
    Tween(AnimationSpec),
    Spring(SpringSpec),
}

impl Default for AnimationType {
    fn default() -> Self {
        AnimationType::Spring(SpringSpec::default())
    }
}

impl From<AnimationSpec> for AnimationType {
    fn from(spec: AnimationSpec) -> Self {
        AnimationType::Tween(spec)
    }
}

impl From<SpringSpec> for AnimationType {
    fn from(spec: SpringSpec) -> Self {
        AnimationType::Spring(spec)
    }
}

/// A fully resolved animation from `initial_value` to `target_value`.
///
/// Value and velocity are pure functions of the play time, so the runner
/// can sample it at whatever frame times the clock delivers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetBasedAnimation {
    spec: AnimationType,
    initial_value: f32,
    target_value: f32,
    initial_velocity: f32,
    duration_nanos: u64,
}

impl TargetBasedAnimation {
    pub fn new(
        spec: AnimationType,
        initial_value: f32,
        target_value: f32,
        initial_velocity: f32,
    ) -> Self {
        let duration_nanos = match spec {
            AnimationType::Tween(tween) => {
                (tween.delay_millis + tween.duration_millis).saturating_mul(1_000_000)
            }
            AnimationType::Spring(spring) => spring
                .settle_millis(
                    (initial_value - target_value) as f64,
                    initial_velocity as f64,
                )
                .saturating_mul(1_000_000),
        };
        Self {
            spec,
            initial_value,
            target_value,
            initial_velocity,
            duration_nanos,
        }
    }

    pub fn spec(&self) -> AnimationType {
        self.spec
    }

    pub fn initial_value(&self) -> f32 {
        self.initial_value
    }

    pub fn target_value(&self) -> f32 {
        self.target_value
    }

    pub fn duration_nanos(&self) -> u64 {
        self.duration_nanos
    }

    pub fn is_finished_from_nanos(&self, play_time_nanos: u64) -> bool {
        play_time_nanos >= self.duration_nanos
    }

    pub fn value_from_nanos(&self, play_time_nanos: u64) -> f32 {
        if self.is_finished_from_nanos(play_time_nanos) {
            return self.target_value;
        }
        match self.spec {
            AnimationType::Tween(tween) => {
                let fraction = tween_fraction(&tween, play_time_nanos);
                let progress = tween.easing.transform(fraction);
                self.initial_value + (self.target_value - self.initial_value) * progress
            }
            AnimationType::Spring(spring) => {
                let (x, _) = spring.solve(
                    (self.initial_value - self.target_value) as f64,
                    self.initial_velocity as f64,
                    play_time_nanos as f64 / 1e9,
                );
                self.target_value + x as f32
            }
        }
    }

    /// Velocity in value units per second.
    pub fn velocity_from_nanos(&self, play_time_nanos: u64) -> f32 {
        match self.spec {
            AnimationType::Tween(_) => {
                if self.is_finished_from_nanos(play_time_nanos) {
                    return 0.0;
                }
                let before = play_time_nanos.saturating_sub(1_000_000);
                let span_seconds = (play_time_nanos - before) as f32 / 1e9;
                if span_seconds <= 0.0 {
                    return self.initial_velocity;
                }
                (self.value_from_nanos(play_time_nanos) - self.value_from_nanos(before))
                    / span_seconds
            }
            AnimationType::Spring(spring) => {
                if self.is_finished_from_nanos(play_time_nanos) {
                    return 0.0;
                }
                let (_, v) = spring.solve(
                    (self.initial_value - self.target_value) as f64,
                    self.initial_velocity as f64,
                    play_time_nanos as f64 / 1e9,
                );
                v as f32
            }
        }
    }
}

fn tween_fraction(spec: &AnimationSpec, play_time_nanos: u64) -> f32 {
    let delay_nanos = spec.delay_millis.saturating_mul(1_000_000);
    if play_time_nanos <= delay_nanos {
        return 0.0;
    }
    if spec.duration_millis == 0 {
        return 1.0;
    }
    let elapsed = (play_time_nanos - delay_nanos) as f64;
    let duration = spec.duration_millis as f64 * 1e6;
    (elapsed / duration).clamp(0.0, 1.0) as f32
}
