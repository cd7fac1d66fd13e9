//! The pager's measure pass.
//!
//! Derives page geometry from the incoming constraints, installs it on the
//! state, and turns the visible window of logical pages into placements with
//! distinct slot keys.

use crate::config::LoopPagerConfig;
use crate::constraints::Constraints;
use crate::host::PagePlacement;
use loop_pager_foundation::{
    LoopPagerItemProvider, LoopPagerState, MeasuredLayout, Orientation, PagerError,
};
use smallvec::SmallVec;
use std::ops::RangeInclusive;

/// Output of [`measure_loop_pager`].
#[derive(Clone, Debug, PartialEq)]
pub struct LoopPagerMeasureResult {
    pub layout: MeasuredLayout,
    /// Size of the pager itself.
    pub width: i32,
    pub height: i32,
    pub visible_range: RangeInclusive<i32>,
    /// Tight constraints every page is measured with.
    pub page_constraints: Constraints,
    pub placements: SmallVec<[PagePlacement; 8]>,
    /// Declared slot count of the item provider after this pass.
    pub item_count: usize,
}

/// Runs one measure pass for `state`.
///
/// The main axis must be bounded. Pages fill it minus the content padding;
/// the cross size follows the aspect ratio and is clamped to the cross
/// constraints.
pub fn measure_loop_pager(
    state: &LoopPagerState,
    provider: &mut LoopPagerItemProvider,
    config: &LoopPagerConfig,
    constraints: Constraints,
) -> Result<LoopPagerMeasureResult, PagerError> {
    config.validate()?;
    let orientation = config.orientation;

    let (_, max_main) = constraints.main_axis(orientation);
    if !max_main.is_finite() {
        return Err(PagerError::UnboundedViewport);
    }
    let viewport_size = max_main.round() as i32;
    let (before_padding, after_padding) = config.content_padding.main_axis_px(orientation);
    let page_size = viewport_size - before_padding - after_padding;
    let (min_cross, max_cross) = constraints.cross_axis(orientation);
    let cross_size = cross_size_for(orientation, page_size, config.aspect_ratio)
        .round()
        .clamp(min_cross, max_cross) as i32;

    let layout = MeasuredLayout {
        orientation,
        viewport_size,
        viewport_size_cross: cross_size,
        page_size,
        page_spacing: config.page_spacing_px(),
        before_padding,
        after_padding,
    };

    if provider.page_count() != state.page_count() {
        provider.set_page_count(state.page_count())?;
    }
    let visible_range = state.on_layout(layout)?;
    let slots = provider.resolve_slots(visible_range.clone());

    let mut placements = SmallVec::<[PagePlacement; 8]>::with_capacity(slots.len());
    for slot in slots {
        let offset_main = state.main_axis_offset(slot.logical_page)?;
        let (x, y) = orientation.pack(offset_main, 0);
        placements.push(PagePlacement {
            slot,
            offset_main,
            offset_cross: 0,
            x,
            y,
        });
    }
    log::trace!(
        "measured {} pages for range {visible_range:?} at page {}",
        placements.len(),
        state.page()
    );

    let page_constraints = Constraints::oriented(
        orientation,
        page_size as f32,
        page_size as f32,
        cross_size as f32,
        cross_size as f32,
    );
    let (width, height) = orientation.pack(viewport_size, cross_size);
    Ok(LoopPagerMeasureResult {
        layout,
        width,
        height,
        visible_range,
        page_constraints,
        placements,
        item_count: provider.item_count(),
    })
}

/// Cross-axis page extent for an aspect ratio of `width / height`.
fn cross_size_for(orientation: Orientation, page_size: i32, aspect_ratio: f32) -> f32 {
    match orientation {
        Orientation::Horizontal => page_size as f32 / aspect_ratio,
        Orientation::Vertical => page_size as f32 * aspect_ratio,
    }
}
