//! Measure pass, gestures and fling behavior for the loop pager.
//!
//! [`LoopPager`] ties a [`LoopPagerState`](loop_pager_foundation::LoopPagerState)
//! to a renderer and a layout host. Everything it uses is public, so hosts
//! with their own gesture plumbing can drive [`measure_loop_pager`] and
//! [`SnapFlingBehavior`] directly.

mod config;
mod constraints;
mod fling;
mod gesture;
mod host;
mod loop_pager;
mod measure;

pub use config::{LoopPagerConfig, PaddingValues, DEFAULT_MAX_FLING_VELOCITY};
pub use constraints::Constraints;
pub use fling::SnapFlingBehavior;
pub use gesture::PagerGestureHandler;
pub use host::{PagePlacement, PagerLayoutHost};
pub use loop_pager::LoopPager;
pub use measure::{measure_loop_pager, LoopPagerMeasureResult};
