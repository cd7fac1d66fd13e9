use std::fmt;

/// Errors raised by pager configuration, measurement and layout reads.
#[derive(Debug, Clone, PartialEq)]
pub enum PagerError {
    /// A pager needs at least one page.
    InvalidPageCount { page_count: usize },
    /// Snap distance bounds cannot be negative.
    InvalidSnapDistance { pages: i32 },
    InvalidPageSpacing { spacing: i32 },
    /// Each padding must be non-negative and below half of the page size.
    InvalidContentPadding {
        before: i32,
        after: i32,
        page_size: i32,
    },
    /// Paddings on both sides need at least three pages to stay stable.
    PaddingNeedsThreePages { page_count: usize },
    NonPositivePageSize { page_size: i32 },
    InvalidAspectRatio { ratio: f32 },
    /// The main axis must be bounded to measure pages.
    UnboundedViewport,
    /// A layout-derived value was read before the first measurement.
    NotMeasured,
}

impl fmt::Display for PagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PagerError::InvalidPageCount { page_count } => {
                write!(f, "page count must be at least 1, got {page_count}")
            }
            PagerError::InvalidSnapDistance { pages } => {
                write!(f, "snap distance must be non-negative, got {pages}")
            }
            PagerError::InvalidPageSpacing { spacing } => {
                write!(f, "page spacing must be non-negative, got {spacing}")
            }
            PagerError::InvalidContentPadding {
                before,
                after,
                page_size,
            } => write!(
                f,
                "content padding ({before}, {after}) must be non-negative and below half of page size {page_size}"
            ),
            PagerError::PaddingNeedsThreePages { page_count } => write!(
                f,
                "padding on both sides requires at least 3 pages, got {page_count}"
            ),
            PagerError::NonPositivePageSize { page_size } => {
                write!(f, "page size must be positive, got {page_size}")
            }
            PagerError::InvalidAspectRatio { ratio } => {
                write!(f, "aspect ratio must be positive and finite, got {ratio}")
            }
            PagerError::UnboundedViewport => {
                write!(f, "pager cannot be measured with an unbounded main axis")
            }
            PagerError::NotMeasured => write!(f, "pager has not been measured yet"),
        }
    }
}

impl std::error::Error for PagerError {}
