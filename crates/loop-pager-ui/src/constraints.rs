//! Size bounds handed to the pager by its parent layout.

use loop_pager_foundation::Orientation;

/// Constraints used during the pager's measure pass, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constraints {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Constraints {
    /// Creates constraints with exact width and height.
    pub fn tight(width: f32, height: f32) -> Self {
        Self {
            min_width: width,
            max_width: width,
            min_height: height,
            max_height: height,
        }
    }

    /// Creates constraints with loose bounds (min = 0, max = given values).
    pub fn loose(max_width: f32, max_height: f32) -> Self {
        Self {
            min_width: 0.0,
            max_width,
            min_height: 0.0,
            max_height,
        }
    }

    pub fn is_tight(&self) -> bool {
        self.min_width == self.max_width && self.min_height == self.max_height
    }

    /// Returns true if all bounds are finite.
    pub fn is_bounded(&self) -> bool {
        self.max_width.is_finite() && self.max_height.is_finite()
    }

    #[inline]
    pub fn has_bounded_width(&self) -> bool {
        self.max_width.is_finite()
    }

    #[inline]
    pub fn has_bounded_height(&self) -> bool {
        self.max_height.is_finite()
    }

    /// Constrains the provided width and height to fit within these constraints.
    pub fn constrain(&self, width: f32, height: f32) -> (f32, f32) {
        (
            width.clamp(self.min_width, self.max_width),
            height.clamp(self.min_height, self.max_height),
        )
    }

    /// `(min, max)` along the scroll axis of `orientation`.
    pub fn main_axis(&self, orientation: Orientation) -> (f32, f32) {
        match orientation {
            Orientation::Horizontal => (self.min_width, self.max_width),
            Orientation::Vertical => (self.min_height, self.max_height),
        }
    }

    /// `(min, max)` perpendicular to the scroll axis of `orientation`.
    pub fn cross_axis(&self, orientation: Orientation) -> (f32, f32) {
        match orientation {
            Orientation::Horizontal => (self.min_height, self.max_height),
            Orientation::Vertical => (self.min_width, self.max_width),
        }
    }

    /// Builds constraints from main and cross bounds for `orientation`.
    pub fn oriented(
        orientation: Orientation,
        min_main: f32,
        max_main: f32,
        min_cross: f32,
        max_cross: f32,
    ) -> Self {
        let (min_width, min_height) = orientation.pack(min_main, min_cross);
        let (max_width, max_height) = orientation.pack(max_main, max_cross);
        Self {
            min_width,
            max_width,
            min_height,
            max_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_follow_orientation() {
        let constraints = Constraints {
            min_width: 1.0,
            max_width: 2.0,
            min_height: 3.0,
            max_height: 4.0,
        };
        assert_eq!(constraints.main_axis(Orientation::Horizontal), (1.0, 2.0));
        assert_eq!(constraints.cross_axis(Orientation::Horizontal), (3.0, 4.0));
        assert_eq!(constraints.main_axis(Orientation::Vertical), (3.0, 4.0));
        assert_eq!(constraints.cross_axis(Orientation::Vertical), (1.0, 2.0));
    }

    #[test]
    fn oriented_round_trips_axes() {
        let vertical = Constraints::oriented(Orientation::Vertical, 10.0, 20.0, 30.0, 40.0);
        assert_eq!(vertical, Constraints { min_width: 30.0, max_width: 40.0, min_height: 10.0, max_height: 20.0 });
        assert!(!vertical.is_tight());
        assert!(Constraints::tight(5.0, 6.0).is_tight());
    }

    #[test]
    fn loose_constraints_can_be_unbounded() {
        let constraints = Constraints::loose(300.0, f32::INFINITY);
        assert!(constraints.has_bounded_width());
        assert!(!constraints.has_bounded_height());
        assert!(!constraints.is_bounded());
        assert_eq!(constraints.constrain(500.0, 10.0), (300.0, 10.0));
    }
}
