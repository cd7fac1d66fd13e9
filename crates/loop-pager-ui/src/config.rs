//! Pager configuration knobs.

use loop_pager_animation::{AnimationType, DecaySpec};
use loop_pager_foundation::{Orientation, PagerError, SnapDistance, DEFAULT_VELOCITY_THRESHOLD};

/// Upper bound for a release velocity, in pixels per second.
pub const DEFAULT_MAX_FLING_VELOCITY: f32 = 8_000.0;

/// Padding around the whole strip of pages. Only the two sides along the
/// scroll axis are applied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PaddingValues {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PaddingValues {
    pub fn uniform(all: f32) -> Self {
        Self {
            left: all,
            top: all,
            right: all,
            bottom: all,
        }
    }

    pub fn horizontal(horizontal: f32) -> Self {
        Self {
            left: horizontal,
            right: horizontal,
            ..Self::default()
        }
    }

    pub fn vertical(vertical: f32) -> Self {
        Self {
            top: vertical,
            bottom: vertical,
            ..Self::default()
        }
    }

    pub fn from_components(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// `(before, after)` padding along the scroll axis, rounded to pixels.
    pub fn main_axis_px(&self, orientation: Orientation) -> (i32, i32) {
        let (before, after) = match orientation {
            Orientation::Horizontal => (self.left, self.right),
            Orientation::Vertical => (self.top, self.bottom),
        };
        (before.round() as i32, after.round() as i32)
    }

    fn is_valid(&self) -> bool {
        [self.left, self.top, self.right, self.bottom]
            .iter()
            .all(|side| side.is_finite() && *side >= 0.0)
    }
}

/// Everything about a pager that is not scroll state.
///
/// Build with `LoopPagerConfig::default().with_*()`; [`validate`] is run by
/// the pager on construction.
///
/// [`validate`]: LoopPagerConfig::validate
#[derive(Clone, Debug, PartialEq)]
pub struct LoopPagerConfig {
    pub orientation: Orientation,
    pub page_spacing: f32,
    pub content_padding: PaddingValues,
    /// Page `width / height`.
    pub aspect_ratio: f32,
    /// Release speed (px/s) below which a fling snaps to the nearest page.
    pub velocity_threshold: f32,
    pub snap_distance: SnapDistance,
    /// Drag gestures are ignored when false. Programmatic scrolls still work.
    pub user_scroll_enabled: bool,
    /// Curve of the final snap and of `animate_scroll_to_page`.
    pub snap_animation: AnimationType,
    pub decay: DecaySpec,
    pub max_fling_velocity: f32,
}

impl Default for LoopPagerConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            page_spacing: 0.0,
            content_padding: PaddingValues::default(),
            aspect_ratio: 1.0,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            snap_distance: SnapDistance::default(),
            user_scroll_enabled: true,
            snap_animation: AnimationType::default(),
            decay: DecaySpec::default(),
            max_fling_velocity: DEFAULT_MAX_FLING_VELOCITY,
        }
    }
}

impl LoopPagerConfig {
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_page_spacing(mut self, page_spacing: f32) -> Self {
        self.page_spacing = page_spacing;
        self
    }

    pub fn with_content_padding(mut self, content_padding: PaddingValues) -> Self {
        self.content_padding = content_padding;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_velocity_threshold(mut self, velocity_threshold: f32) -> Self {
        self.velocity_threshold = velocity_threshold;
        self
    }

    pub fn with_snap_distance(mut self, snap_distance: SnapDistance) -> Self {
        self.snap_distance = snap_distance;
        self
    }

    pub fn with_user_scroll_enabled(mut self, enabled: bool) -> Self {
        self.user_scroll_enabled = enabled;
        self
    }

    pub fn with_snap_animation(mut self, snap_animation: impl Into<AnimationType>) -> Self {
        self.snap_animation = snap_animation.into();
        self
    }

    pub fn with_decay(mut self, decay: DecaySpec) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_max_fling_velocity(mut self, max_fling_velocity: f32) -> Self {
        self.max_fling_velocity = max_fling_velocity;
        self
    }

    /// Page spacing rounded to pixels.
    pub fn page_spacing_px(&self) -> i32 {
        self.page_spacing.round() as i32
    }

    /// Checks the knobs that do not depend on measured sizes.
    pub fn validate(&self) -> Result<(), PagerError> {
        if !self.page_spacing.is_finite() || self.page_spacing_px() < 0 {
            return Err(PagerError::InvalidPageSpacing {
                spacing: self.page_spacing_px(),
            });
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(PagerError::InvalidAspectRatio {
                ratio: self.aspect_ratio,
            });
        }
        if !self.content_padding.is_valid() {
            let (before, after) = self.content_padding.main_axis_px(self.orientation);
            return Err(PagerError::InvalidContentPadding {
                before,
                after,
                page_size: 0,
            });
        }
        Ok(())
    }
}
