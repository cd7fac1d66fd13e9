//! Decay curves: an initial velocity bleeding off to rest with no fixed target.
//!
//! Two flavours are provided. [`ExponentialDecaySpec`] is a plain friction
//! model; [`SplineBasedDecaySpec`] reproduces the platform scroller's fling
//! spline and scales with screen density.

use std::sync::LazyLock;

/// Curve with no target; the resting value is derived from the velocity.
pub trait FloatDecayAnimationSpec {
    /// Speed below which the decay is considered finished.
    fn abs_velocity_threshold(&self) -> f32;

    fn value_from_nanos(&self, play_time_nanos: u64, initial_value: f32, initial_velocity: f32)
        -> f32;

    fn velocity_from_nanos(
        &self,
        play_time_nanos: u64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32;

    fn duration_nanos(&self, initial_value: f32, initial_velocity: f32) -> u64;

    /// Where the value comes to rest.
    fn target_value(&self, initial_value: f32, initial_velocity: f32) -> f32;
}

const EXPONENTIAL_FRICTION: f32 = -4.2;
const DEFAULT_EXPONENTIAL_VELOCITY_THRESHOLD: f32 = 0.1;

/// Exponential friction decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecaySpec {
    friction: f32,
    abs_velocity_threshold: f32,
}

impl ExponentialDecaySpec {
    /// Higher multipliers stop sooner.
    pub fn new(friction_multiplier: f32) -> Self {
        Self {
            friction: EXPONENTIAL_FRICTION * friction_multiplier.max(1e-4),
            abs_velocity_threshold: DEFAULT_EXPONENTIAL_VELOCITY_THRESHOLD,
        }
    }

    pub fn with_velocity_threshold(mut self, threshold: f32) -> Self {
        self.abs_velocity_threshold = threshold.abs().max(1e-7);
        self
    }
}

impl Default for ExponentialDecaySpec {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl FloatDecayAnimationSpec for ExponentialDecaySpec {
    fn abs_velocity_threshold(&self) -> f32 {
        self.abs_velocity_threshold
    }

    fn value_from_nanos(
        &self,
        play_time_nanos: u64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let seconds = play_time_nanos as f32 / 1e9;
        let reach = initial_velocity / self.friction;
        initial_value - reach + reach * (self.friction * seconds).exp()
    }

    fn velocity_from_nanos(
        &self,
        play_time_nanos: u64,
        _initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let seconds = play_time_nanos as f32 / 1e9;
        initial_velocity * (self.friction * seconds).exp()
    }

    fn duration_nanos(&self, _initial_value: f32, initial_velocity: f32) -> u64 {
        let speed = initial_velocity.abs();
        if speed <= self.abs_velocity_threshold {
            return 0;
        }
        let millis = 1000.0 * (self.abs_velocity_threshold / speed).ln() / self.friction;
        (millis.max(0.0) as f64 * 1e6) as u64
    }

    fn target_value(&self, initial_value: f32, initial_velocity: f32) -> f32 {
        initial_value - initial_velocity / self.friction
    }
}

const INFLECTION: f64 = 0.35;
const START_TENSION: f64 = 0.5;
const END_TENSION: f64 = 1.0;
const P1: f64 = START_TENSION * INFLECTION;
const P2: f64 = 1.0 - END_TENSION * (1.0 - INFLECTION);
const SPLINE_SAMPLES: usize = 100;

/// Distance covered at each of `SPLINE_SAMPLES + 1` evenly spaced times.
static SPLINE_POSITIONS: LazyLock<[f32; SPLINE_SAMPLES + 1]> = LazyLock::new(|| {
    let mut positions = [1.0f32; SPLINE_SAMPLES + 1];
    let mut lower = 0.0f64;
    for (sample, slot) in positions.iter_mut().enumerate().take(SPLINE_SAMPLES) {
        let alpha = sample as f64 / SPLINE_SAMPLES as f64;
        let mut upper = 1.0f64;
        let mut x = lower;
        // The curve is monotonic, so each sample can start where the last ended.
        for _ in 0..64 {
            x = lower + (upper - lower) / 2.0;
            let traveled = tension_curve(x, P1, P2);
            if (traveled - alpha).abs() < 1e-7 {
                break;
            }
            if traveled > alpha {
                upper = x;
            } else {
                lower = x;
            }
        }
        *slot = tension_curve(x, START_TENSION, 1.0) as f32;
    }
    positions
});

fn tension_curve(x: f64, start: f64, end: f64) -> f64 {
    3.0 * x * (1.0 - x) * ((1.0 - x) * start + x * end) + x * x * x
}

/// Distance and velocity coefficients of the fling spline at a normalized time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineSample {
    pub distance: f32,
    pub velocity: f32,
}

pub fn fling_spline(time: f32) -> SplineSample {
    let time = time.clamp(0.0, 1.0);
    let index = (SPLINE_SAMPLES as f32 * time) as usize;
    if index >= SPLINE_SAMPLES {
        return SplineSample {
            distance: 1.0,
            velocity: 0.0,
        };
    }
    let start_time = index as f32 / SPLINE_SAMPLES as f32;
    let end_time = (index + 1) as f32 / SPLINE_SAMPLES as f32;
    let start = SPLINE_POSITIONS[index];
    let end = SPLINE_POSITIONS[index + 1];
    let velocity = (end - start) / (end_time - start_time);
    SplineSample {
        distance: start + (time - start_time) * velocity,
        velocity,
    }
}

const GRAVITY_EARTH: f32 = 9.80665;
const INCHES_PER_METER: f32 = 39.37;
/// `ln(0.78) / ln(0.9)`
const DECELERATION_RATE: f64 = 2.358_201_6;

/// Physical fling model matching the platform scroller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingCalculator {
    friction: f32,
    physical_coefficient: f32,
}

impl FlingCalculator {
    pub const DEFAULT_FRICTION: f32 = 0.015;

    pub fn new(friction: f32, density: f32) -> Self {
        Self {
            friction,
            physical_coefficient: GRAVITY_EARTH * INCHES_PER_METER * density * 160.0 * 0.84,
        }
    }

    pub fn with_density(density: f32) -> Self {
        Self::new(Self::DEFAULT_FRICTION, density)
    }

    fn deceleration(&self, velocity: f32) -> f64 {
        let friction = (self.friction * self.physical_coefficient) as f64;
        (INFLECTION * velocity.abs() as f64 / friction).ln()
    }

    pub fn duration_millis(&self, velocity: f32) -> u64 {
        if velocity == 0.0 {
            return 0;
        }
        let exponent = self.deceleration(velocity) / (DECELERATION_RATE - 1.0);
        (1000.0 * exponent.exp()).max(0.0) as u64
    }

    /// Unsigned distance travelled by a fling.
    pub fn distance(&self, velocity: f32) -> f32 {
        if velocity == 0.0 {
            return 0.0;
        }
        let exponent = DECELERATION_RATE / (DECELERATION_RATE - 1.0) * self.deceleration(velocity);
        self.friction * self.physical_coefficient * exponent.exp() as f32
    }
}

/// Fling decay following the platform spline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineBasedDecaySpec {
    calculator: FlingCalculator,
}

impl SplineBasedDecaySpec {
    pub fn new(density: f32) -> Self {
        Self {
            calculator: FlingCalculator::with_density(density),
        }
    }

    pub fn with_calculator(calculator: FlingCalculator) -> Self {
        Self { calculator }
    }

    fn normalized_time(&self, play_time_nanos: u64, initial_velocity: f32) -> f32 {
        let duration = self.calculator.duration_millis(initial_velocity);
        if duration == 0 {
            return 1.0;
        }
        (play_time_nanos / 1_000_000) as f32 / duration as f32
    }
}

impl FloatDecayAnimationSpec for SplineBasedDecaySpec {
    fn abs_velocity_threshold(&self) -> f32 {
        0.0
    }

    fn value_from_nanos(
        &self,
        play_time_nanos: u64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let sample = fling_spline(self.normalized_time(play_time_nanos, initial_velocity));
        initial_value
            + self.calculator.distance(initial_velocity) * initial_velocity.signum() * sample.distance
    }

    fn velocity_from_nanos(
        &self,
        play_time_nanos: u64,
        _initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let duration = self.calculator.duration_millis(initial_velocity);
        if duration == 0 {
            return 0.0;
        }
        let sample = fling_spline(self.normalized_time(play_time_nanos, initial_velocity));
        sample.velocity * initial_velocity.signum() * self.calculator.distance(initial_velocity)
            / duration as f32
            * 1000.0
    }

    fn duration_nanos(&self, _initial_value: f32, initial_velocity: f32) -> u64 {
        self.calculator
            .duration_millis(initial_velocity)
            .saturating_mul(1_000_000)
    }

    fn target_value(&self, initial_value: f32, initial_velocity: f32) -> f32 {
        initial_value + self.calculator.distance(initial_velocity) * initial_velocity.signum()
    }
}

/// Decay curves the pager can be configured with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecaySpec {
    Exponential(ExponentialDecaySpec),
    Spline(SplineBasedDecaySpec),
}

impl Default for DecaySpec {
    fn default() -> Self {
        DecaySpec::Exponential(ExponentialDecaySpec::default())
    }
}

impl FloatDecayAnimationSpec for DecaySpec {
    fn abs_velocity_threshold(&self) -> f32 {
        match self {
            DecaySpec::Exponential(spec) => spec.abs_velocity_threshold(),
            DecaySpec::Spline(spec) => spec.abs_velocity_threshold(),
        }
    }

    fn value_from_nanos(
        &self,
        play_time_nanos: u64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        match self {
            DecaySpec::Exponential(spec) => {
                spec.value_from_nanos(play_time_nanos, initial_value, initial_velocity)
            }
            DecaySpec::Spline(spec) => {
                spec.value_from_nanos(play_time_nanos, initial_value, initial_velocity)
            }
        }
    }

    fn velocity_from_nanos(
        &self,
        play_time_nanos: u64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        match self {
            DecaySpec::Exponential(spec) => {
                spec.velocity_from_nanos(play_time_nanos, initial_value, initial_velocity)
            }
            DecaySpec::Spline(spec) => {
                spec.velocity_from_nanos(play_time_nanos, initial_value, initial_velocity)
            }
        }
    }

    fn duration_nanos(&self, initial_value: f32, initial_velocity: f32) -> u64 {
        match self {
            DecaySpec::Exponential(spec) => spec.duration_nanos(initial_value, initial_velocity),
            DecaySpec::Spline(spec) => spec.duration_nanos(initial_value, initial_velocity),
        }
    }

    fn target_value(&self, initial_value: f32, initial_velocity: f32) -> f32 {
        match self {
            DecaySpec::Exponential(spec) => spec.target_value(initial_value, initial_velocity),
            DecaySpec::Spline(spec) => spec.target_value(initial_value, initial_velocity),
        }
    }
}
