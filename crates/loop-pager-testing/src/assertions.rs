//! Assertion helpers for pager tests.

use loop_pager_foundation::LoopPagerState;

/// Assert that a value is within `tolerance` of the expected one.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

/// Assert that the pager rests exactly on `page` with nothing in flight.
pub fn assert_settled_on(state: &LoopPagerState, page: i32) {
    assert_eq!(state.page(), page as f32, "position of {:?}", state);
    assert_eq!(state.current_page(), page, "current page of {:?}", state);
    assert_eq!(state.target_page(), page, "target page of {:?}", state);
    assert_eq!(state.settled_page(), page, "settled page of {:?}", state);
    assert!(
        !state.is_scroll_in_progress(),
        "scroll still in progress: {:?}",
        state
    );
}
