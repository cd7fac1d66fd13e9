//! Headless test harness for the loop pager

mod assertions;
mod recording_host;
mod test_rule;

pub use assertions::{assert_approx_eq, assert_settled_on};
pub use recording_host::RecordingLayoutHost;
pub use test_rule::{PagerTestRule, MAX_IDLE_FRAMES};
