use loop_pager_foundation::{
    LoopPagerState, NestedScrollConnection, NestedScrollConnectionExt, NestedScrollSource,
    ScrollOutcome, ScrollPhase, SnapDistance,
};
use loop_pager_testing::{assert_approx_eq, assert_settled_on, PagerTestRule, RecordingLayoutHost};
use loop_pager_ui::{Constraints, LoopPager, LoopPagerConfig};
use std::cell::RefCell;
use std::rc::Rc;
use web_time::Instant;

fn measured_pager(rule: &PagerTestRule, config: LoopPagerConfig) -> LoopPager<usize> {
    let state = LoopPagerState::new(5, 0).unwrap();
    let mut pager = LoopPager::horizontal(state, config, rule.clock(), |page| page).unwrap();
    pager
        .layout(Constraints::loose(100.0, 100.0), &mut RecordingLayoutHost::new())
        .unwrap();
    pager
}

#[test]
fn fast_flick_advances_one_page_with_default_snap_distance() {
    let rule = PagerTestRule::new();
    let mut pager = measured_pager(&rule, LoopPagerConfig::default());

    pager.drag_by(-30.0, Instant::now());
    let job = pager.release_with_velocity(-3000.0);
    // The decay would travel seven pages, Bounded(1) keeps it to one.
    assert_eq!(pager.state().target_page(), 1);
    assert_eq!(pager.state().phase(), ScrollPhase::Snapping);

    rule.advance_until_idle();
    assert_eq!(job.outcome(), Some(ScrollOutcome::Completed));
    assert_settled_on(pager.state(), 1);
}

#[test]
fn backward_flick_passes_the_nearer_page() {
    let rule = PagerTestRule::new();
    let mut pager = measured_pager(&rule, LoopPagerConfig::default());

    pager.drag_by(-30.0, Instant::now());
    let job = pager.release_with_velocity(1000.0);
    // From 0.3 the decay suggests page -2; Bounded(1) around page 0 allows -1.
    assert_eq!(pager.state().target_page(), -1);
    assert_eq!(pager.state().phase(), ScrollPhase::Flinging);

    rule.advance_until_idle();
    assert_eq!(job.outcome(), Some(ScrollOutcome::Completed));
    assert_settled_on(pager.state(), -1);
}

#[test]
fn unlimited_fling_decays_then_snaps() {
    let rule = PagerTestRule::new();
    let config = LoopPagerConfig::default().with_snap_distance(SnapDistance::Unlimited);
    let mut pager = measured_pager(&rule, config);

    let job = pager.release_with_velocity(-3000.0);
    // Exponential decay travels 3000 / 4.2 ≈ 714px, so page 7 is committed.
    assert_eq!(pager.state().target_page(), 7);
    assert_eq!(pager.state().phase(), ScrollPhase::Flinging);

    let state = pager.state().clone();
    assert!(rule.advance_until(|| state.phase() == ScrollPhase::Snapping));
    assert_approx_eq(state.page(), 6.0, 1e-3, "hand-over position");
    assert_eq!(state.target_page(), 7);

    rule.advance_until_idle();
    assert_eq!(job.outcome(), Some(ScrollOutcome::Completed));
    assert_settled_on(&state, 7);
    assert_eq!(state.current_physical_page(), 2);
}

#[test]
fn settled_page_changes_only_on_landing() {
    let rule = PagerTestRule::new();
    let config = LoopPagerConfig::default().with_snap_distance(SnapDistance::Unlimited);
    let mut pager = measured_pager(&rule, config);
    let settled = Rc::new(RefCell::new(Vec::new()));
    let sink = settled.clone();
    pager
        .state()
        .add_settled_page_listener(move |page| sink.borrow_mut().push(page));

    pager.release_with_velocity(3000.0);
    rule.advance_until_idle();
    assert_eq!(*settled.borrow(), vec![-7]);
}

#[test]
fn drag_during_fling_takes_over() {
    let rule = PagerTestRule::new();
    let config = LoopPagerConfig::default().with_snap_distance(SnapDistance::Unlimited);
    let mut pager = measured_pager(&rule, config);

    let job = pager.release_with_velocity(-3000.0);
    rule.advance_frames(5);
    assert_eq!(pager.state().phase(), ScrollPhase::Flinging);

    assert!(pager.drag_start(Instant::now()));
    rule.advance_frame();
    assert_eq!(job.outcome(), Some(ScrollOutcome::Cancelled));
    assert_eq!(pager.state().phase(), ScrollPhase::Dragging);
    assert_eq!(pager.state().target_page(), pager.state().current_page());
    assert!(!rule.has_pending_frames());
}

#[test]
fn programmatic_scroll_preempts_a_fling() {
    let rule = PagerTestRule::new();
    let config = LoopPagerConfig::default().with_snap_distance(SnapDistance::Unlimited);
    let mut pager = measured_pager(&rule, config);

    let fling = pager.release_with_velocity(-3000.0);
    rule.advance_frames(2);
    assert_eq!(pager.state().phase(), ScrollPhase::Flinging);

    let animation = pager.animate_scroll_to_page(-10);
    assert_eq!(animation.outcome(), None);
    assert_eq!(pager.state().target_page(), -10);
    assert_eq!(pager.state().phase(), ScrollPhase::Animating);

    rule.advance_until_idle();
    assert_eq!(fling.outcome(), Some(ScrollOutcome::Cancelled));
    assert_eq!(animation.outcome(), Some(ScrollOutcome::Completed));
    assert_settled_on(pager.state(), -10);
}

#[test]
fn programmatic_scroll_preempts_a_fling_started_by_a_drag() {
    let rule = PagerTestRule::new();
    let config = LoopPagerConfig::default().with_snap_distance(SnapDistance::Unlimited);
    let mut pager = measured_pager(&rule, config);

    pager.drag_by(-30.0, Instant::now());
    let fling = pager.release_with_velocity(-3000.0);
    rule.advance_frames(2);
    assert!(!pager.is_dragging());

    let animation = pager.animate_scroll_to_page(2);
    rule.advance_until_idle();
    assert_eq!(fling.outcome(), Some(ScrollOutcome::Cancelled));
    assert_eq!(animation.outcome(), Some(ScrollOutcome::Completed));
    assert_settled_on(pager.state(), 2);
}

#[test]
fn jump_during_snap_cancels_the_snap() {
    let rule = PagerTestRule::new();
    let mut pager = measured_pager(&rule, LoopPagerConfig::default());

    pager.drag_by(-30.0, Instant::now());
    let snap = pager.release_with_velocity(-3000.0);
    rule.advance_frames(2);
    assert_eq!(pager.state().phase(), ScrollPhase::Snapping);

    pager.scroll_to_page(4);
    assert_settled_on(pager.state(), 4);
    rule.advance_until_idle();
    assert_eq!(snap.outcome(), Some(ScrollOutcome::Cancelled));
    assert_settled_on(pager.state(), 4);
    assert_eq!(pager.state().phase(), ScrollPhase::Idle);
}

#[test]
fn cancelling_the_job_leaves_state_consistent() {
    let rule = PagerTestRule::new();
    let mut pager = measured_pager(&rule, LoopPagerConfig::default());

    pager.drag_by(-30.0, Instant::now());
    let job = pager.release_with_velocity(-3000.0);
    rule.advance_frames(2);
    job.cancel();

    assert_eq!(job.outcome(), Some(ScrollOutcome::Cancelled));
    assert_eq!(pager.state().phase(), ScrollPhase::Idle);
    assert_eq!(pager.state().target_page(), pager.state().current_page());
    rule.advance_until_idle();
    assert_eq!(pager.state().phase(), ScrollPhase::Idle);
}

#[derive(Clone, Default)]
struct RecordingParent {
    sources: Rc<RefCell<Vec<NestedScrollSource>>>,
}

impl NestedScrollConnection for RecordingParent {
    fn on_pre_scroll(&self, _available: f32, source: NestedScrollSource) -> f32 {
        self.sources.borrow_mut().push(source);
        0.0
    }
}

#[test]
fn filtered_parent_sees_drags_but_not_flings() {
    let rule = PagerTestRule::new();
    let mut pager = measured_pager(&rule, LoopPagerConfig::default());
    let parent = RecordingParent::default();
    pager
        .state()
        .set_nested_scroll_parent(Some(Rc::new(parent.clone().filter_user_input())));

    let start = Instant::now();
    pager.drag_by(-20.0, start);
    pager.drag_by(-20.0, start);
    pager.release_with_velocity(-1000.0);
    rule.advance_until_idle();

    assert_settled_on(pager.state(), 1);
    assert_eq!(
        *parent.sources.borrow(),
        vec![NestedScrollSource::UserInput, NestedScrollSource::UserInput]
    );
}
