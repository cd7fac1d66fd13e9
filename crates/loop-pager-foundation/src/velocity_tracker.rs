//! Release velocity estimation for drags along the pager's main axis.
//!
//! Uses the impulse strategy: every pair of consecutive samples imparts
//! kinetic energy, and the accumulated energy is converted back into a speed.
//! Only the last [`HORIZON_MS`] of motion counts, and a pause longer than
//! [`ASSUME_STOPPED_MS`] discards everything before it.

use std::collections::VecDeque;

const HISTORY_SIZE: usize = 20;
pub const HORIZON_MS: i64 = 100;
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Sample {
    time_ms: i64,
    position: f32,
}

/// Tracks drag deltas and estimates the release velocity in px/s.
#[derive(Clone, Debug, Default)]
pub struct DragVelocityTracker {
    samples: VecDeque<Sample>,
    position: f32,
}

impl DragVelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the drag moving by `delta` pixels at `time_ms`.
    pub fn add_delta(&mut self, time_ms: i64, delta: f32) {
        self.position += delta;
        self.add_position(time_ms, self.position);
    }

    /// Records an absolute pointer position along the main axis.
    pub fn add_position(&mut self, time_ms: i64, position: f32) {
        self.position = position;
        if self.samples.len() == HISTORY_SIZE {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { time_ms, position });
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.position = 0.0;
    }

    pub fn velocity(&self) -> f32 {
        let recent = self.recent_samples();
        if recent.len() < 2 {
            return 0.0;
        }

        let mut work = 0.0f32;
        for (index, pair) in recent.windows(2).enumerate() {
            let elapsed = (pair[1].time_ms - pair[0].time_ms) as f32;
            if elapsed == 0.0 {
                continue;
            }
            let segment_velocity = (pair[1].position - pair[0].position) / elapsed;
            let carried = energy_to_velocity(work);
            work += (segment_velocity - carried) * segment_velocity.abs();
            if index == 0 {
                work *= 0.5;
            }
        }
        energy_to_velocity(work) * 1000.0
    }

    /// Velocity clamped to `[-max_velocity, max_velocity]`.
    pub fn velocity_with_max(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }
        let velocity = self.velocity();
        if velocity.is_nan() {
            return 0.0;
        }
        velocity.clamp(-max_velocity, max_velocity)
    }

    /// Samples inside the horizon with no stop gap, oldest first.
    fn recent_samples(&self) -> Vec<Sample> {
        let Some(newest) = self.samples.back().copied() else {
            return Vec::new();
        };
        let mut recent = Vec::with_capacity(self.samples.len());
        let mut later = newest;
        for sample in self.samples.iter().rev() {
            if newest.time_ms - sample.time_ms > HORIZON_MS
                || later.time_ms - sample.time_ms > ASSUME_STOPPED_MS
            {
                break;
            }
            recent.push(*sample);
            later = *sample;
        }
        recent.reverse();
        recent
    }
}

/// `E = v^2 / 2` with unit mass, keeping the sign.
fn energy_to_velocity(energy: f32) -> f32 {
    energy.signum() * (2.0 * energy.abs()).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_motion_yields_its_speed() {
        let mut tracker = DragVelocityTracker::new();
        for step in 0..10 {
            tracker.add_delta(step * 10, 10.0);
        }
        assert!((tracker.velocity() - 1000.0).abs() < 1.0);
    }

    #[test]
    fn negative_motion_keeps_its_sign() {
        let mut tracker = DragVelocityTracker::new();
        for step in 0..6 {
            tracker.add_delta(step * 8, -4.0);
        }
        assert!((tracker.velocity() - -500.0).abs() < 1.0);
    }

    #[test]
    fn pause_before_release_drops_history() {
        let mut tracker = DragVelocityTracker::new();
        for step in 0..5 {
            tracker.add_delta(step * 10, 20.0);
        }
        tracker.add_delta(200, 0.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn single_sample_has_no_velocity() {
        let mut tracker = DragVelocityTracker::new();
        tracker.add_delta(0, 50.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn velocity_is_clamped() {
        let mut tracker = DragVelocityTracker::new();
        for step in 0..5 {
            tracker.add_delta(step * 10, 200.0);
        }
        assert_eq!(tracker.velocity_with_max(8000.0), 8000.0);
        assert_eq!(tracker.velocity_with_max(0.0), 0.0);
    }

    #[test]
    fn reset_forgets_samples() {
        let mut tracker = DragVelocityTracker::new();
        tracker.add_delta(0, 10.0);
        tracker.add_delta(10, 10.0);
        tracker.reset();
        assert_eq!(tracker.velocity(), 0.0);
    }
}
