//! Limits on how far a single fling may travel.

use crate::error::PagerError;

/// Bounds the page a fling may land on.
pub trait PagerSnapDistance {
    /// Returns the page to settle on given the page the fling started from
    /// and the page the decay would have reached unconstrained.
    fn calculate_target_page(
        &self,
        start_page: i32,
        suggested_target_page: i32,
        velocity: f32,
        page_size: i32,
        page_spacing: i32,
    ) -> i32;
}

/// Built-in snap distance policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SnapDistance {
    /// The fling lands wherever the decay takes it.
    Unlimited,
    /// The fling lands at most this many pages from its start.
    Bounded(u32),
}

impl SnapDistance {
    pub fn bounded(pages: i32) -> Result<Self, PagerError> {
        u32::try_from(pages)
            .map(SnapDistance::Bounded)
            .map_err(|_| PagerError::InvalidSnapDistance { pages })
    }
}

impl Default for SnapDistance {
    fn default() -> Self {
        SnapDistance::Bounded(1)
    }
}

impl PagerSnapDistance for SnapDistance {
    fn calculate_target_page(
        &self,
        start_page: i32,
        suggested_target_page: i32,
        _velocity: f32,
        _page_size: i32,
        _page_spacing: i32,
    ) -> i32 {
        match *self {
            SnapDistance::Unlimited => suggested_target_page,
            SnapDistance::Bounded(pages) => {
                let start = i64::from(start_page);
                let low = (start - i64::from(pages)).max(i64::from(i32::MIN));
                let high = (start + i64::from(pages)).min(i64::from(i32::MAX));
                // Both bounds were clamped into i32 range above.
                i64::from(suggested_target_page).clamp(low, high) as i32
            }
        }
    }
}
