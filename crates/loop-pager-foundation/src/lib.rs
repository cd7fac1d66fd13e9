//! Scroll state, snapping and page identity for an infinitely looping pager.
//!
//! [`LoopPagerState`] owns the unbounded scroll position. Layout hosts feed it
//! a [`MeasuredLayout`], ask it for the window of logical pages to draw and
//! turn that window into distinct render slots with
//! [`LoopPagerItemProvider`]. Release gestures go through
//! [`LoopPagerSnapLayoutProvider`] to pick where a fling lands.

mod error;
mod item_provider;
mod layout_info;
mod nested_scroll;
mod orientation;
mod pager_state;
mod snap_distance;
mod snap_layout_provider;
mod velocity_tracker;

pub use error::PagerError;
pub use item_provider::{physical_page, LoopPagerItemProvider, PageSlot};
pub use layout_info::{LoopPagerLayoutInfo, MeasuredLayout};
pub use nested_scroll::{
    FilterUserInput, NestedScrollConnection, NestedScrollConnectionExt, NestedScrollSource,
};
pub use orientation::Orientation;
pub use pager_state::{
    ListenerId, LoopPagerSaver, LoopPagerState, ScrollJob, ScrollOutcome, ScrollPhase,
    ScrollSession, SETTLE_EPSILON,
};
pub use snap_distance::{PagerSnapDistance, SnapDistance};
pub use snap_layout_provider::{
    LoopPagerSnapLayoutProvider, SnapTarget, DEFAULT_VELOCITY_THRESHOLD,
};
pub use velocity_tracker::DragVelocityTracker;
