//! Geometry snapshot of a measured pager.

use crate::error::PagerError;
use crate::orientation::Orientation;

/// Pixel geometry of a measured pager along its main axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MeasuredLayout {
    pub orientation: Orientation,
    pub viewport_size: i32,
    pub viewport_size_cross: i32,
    pub page_size: i32,
    pub page_spacing: i32,
    pub before_padding: i32,
    pub after_padding: i32,
}

impl MeasuredLayout {
    /// Distance between the leading edges of two consecutive pages.
    pub fn page_interval(&self) -> i32 {
        self.page_size + self.page_spacing
    }

    pub fn validate(&self, page_count: usize) -> Result<(), PagerError> {
        if self.page_size <= 0 {
            return Err(PagerError::NonPositivePageSize {
                page_size: self.page_size,
            });
        }
        if self.page_spacing < 0 {
            return Err(PagerError::InvalidPageSpacing {
                spacing: self.page_spacing,
            });
        }
        let half_page = self.page_size / 2;
        let padding_fits = |padding: i32| (0..half_page).contains(&padding);
        if !padding_fits(self.before_padding) || !padding_fits(self.after_padding) {
            return Err(PagerError::InvalidContentPadding {
                before: self.before_padding,
                after: self.after_padding,
                page_size: self.page_size,
            });
        }
        if self.before_padding > 0 && self.after_padding > 0 && page_count < 3 {
            return Err(PagerError::PaddingNeedsThreePages { page_count });
        }
        Ok(())
    }
}

/// Layout state of a pager: either not measured yet, or a measured snapshot.
///
/// Replaced wholesale on every measure pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoopPagerLayoutInfo {
    #[default]
    Unmeasured,
    Measured(MeasuredLayout),
}

impl LoopPagerLayoutInfo {
    /// Validates `layout` against `page_count` and wraps it.
    pub fn measured(layout: MeasuredLayout, page_count: usize) -> Result<Self, PagerError> {
        layout.validate(page_count)?;
        Ok(Self::Measured(layout))
    }

    pub fn is_measured(&self) -> bool {
        matches!(self, Self::Measured(_))
    }

    pub fn as_measured(&self) -> Option<&MeasuredLayout> {
        match self {
            Self::Measured(layout) => Some(layout),
            Self::Unmeasured => None,
        }
    }

    pub fn require_measured(&self) -> Result<&MeasuredLayout, PagerError> {
        self.as_measured().ok_or(PagerError::NotMeasured)
    }

    pub fn orientation(&self) -> Orientation {
        self.as_measured()
            .map(|layout| layout.orientation)
            .unwrap_or_default()
    }

    pub fn viewport_size(&self) -> i32 {
        self.field(|layout| layout.viewport_size)
    }

    pub fn viewport_size_cross(&self) -> i32 {
        self.field(|layout| layout.viewport_size_cross)
    }

    pub fn page_size(&self) -> i32 {
        self.field(|layout| layout.page_size)
    }

    pub fn page_spacing(&self) -> i32 {
        self.field(|layout| layout.page_spacing)
    }

    pub fn before_padding(&self) -> i32 {
        self.field(|layout| layout.before_padding)
    }

    pub fn after_padding(&self) -> i32 {
        self.field(|layout| layout.after_padding)
    }

    pub fn page_interval(&self) -> i32 {
        self.field(MeasuredLayout::page_interval)
    }

    fn field(&self, read: impl Fn(&MeasuredLayout) -> i32) -> i32 {
        self.as_measured().map(read).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(page_size: i32, before: i32, after: i32) -> MeasuredLayout {
        MeasuredLayout {
            viewport_size: page_size + before + after,
            viewport_size_cross: 100,
            page_size,
            before_padding: before,
            after_padding: after,
            ..Default::default()
        }
    }

    #[test]
    fn unmeasured_reports_zero_everywhere() {
        let info = LoopPagerLayoutInfo::Unmeasured;
        assert!(!info.is_measured());
        assert_eq!(info.page_interval(), 0);
        assert_eq!(info.viewport_size(), 0);
        assert_eq!(info.require_measured(), Err(PagerError::NotMeasured));
    }

    #[test]
    fn page_interval_adds_spacing() {
        let mut measured = layout(100, 0, 0);
        measured.page_spacing = 8;
        let info = LoopPagerLayoutInfo::measured(measured, 1).unwrap();
        assert_eq!(info.page_interval(), 108);
    }

    #[test]
    fn padding_must_stay_below_half_a_page() {
        assert!(layout(100, 49, 0).validate(1).is_ok());
        assert!(matches!(
            layout(100, 50, 0).validate(1),
            Err(PagerError::InvalidContentPadding { .. })
        ));
        assert!(matches!(
            layout(100, 0, -1).validate(1),
            Err(PagerError::InvalidContentPadding { .. })
        ));
    }

    #[test]
    fn double_padding_requires_three_pages() {
        assert_eq!(
            layout(100, 10, 10).validate(2),
            Err(PagerError::PaddingNeedsThreePages { page_count: 2 })
        );
        assert!(layout(100, 10, 10).validate(3).is_ok());
        assert!(layout(100, 10, 0).validate(1).is_ok());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert_eq!(
            layout(0, 0, 0).validate(1),
            Err(PagerError::NonPositivePageSize { page_size: 0 })
        );
    }

    #[test]
    fn negative_spacing_is_rejected() {
        let mut measured = layout(100, 0, 0);
        measured.page_spacing = -4;
        assert_eq!(
            measured.validate(1),
            Err(PagerError::InvalidPageSpacing { spacing: -4 })
        );
    }
}
