use loop_pager_foundation::{LoopPagerSaver, LoopPagerState, ScrollOutcome, ScrollPhase};
use loop_pager_testing::{assert_approx_eq, assert_settled_on, PagerTestRule, RecordingLayoutHost};
use loop_pager_ui::{Constraints, LoopPager, LoopPagerConfig, PaddingValues};
use web_time::{Duration, Instant};

fn horizontal_pager(
    rule: &PagerTestRule,
    page_count: usize,
    config: LoopPagerConfig,
) -> LoopPager<String> {
    let state = LoopPagerState::new(page_count, 0).unwrap();
    LoopPager::horizontal(state, config, rule.clock(), |page| format!("page {page}")).unwrap()
}

#[test]
fn slow_release_after_drag_snaps_to_signed_logical_page() {
    let rule = PagerTestRule::new();
    let mut pager = horizontal_pager(&rule, 5, LoopPagerConfig::default());
    let mut host = RecordingLayoutHost::new();
    pager.layout(Constraints::loose(100.0, 100.0), &mut host).unwrap();

    let start = Instant::now();
    assert!(pager.drag_start(start));
    // 2.6 pages toward the end edge reveals lower pages.
    assert_eq!(pager.drag_by(260.0, start + Duration::from_millis(16)), 260.0);
    assert_approx_eq(pager.state().page(), -2.6, 1e-4, "position after drag");
    assert_eq!(pager.state().current_page(), -3);

    let job = pager.release_with_velocity(100.0);
    assert_eq!(pager.state().target_page(), -3);
    assert_eq!(pager.state().phase(), ScrollPhase::Snapping);
    rule.advance_until_idle();

    assert_eq!(job.outcome(), Some(ScrollOutcome::Completed));
    assert_settled_on(pager.state(), -3);
    assert_eq!(pager.state().current_physical_page(), 2);
    assert_eq!(pager.state().phase(), ScrollPhase::Idle);

    host.clear();
    pager.layout(Constraints::loose(100.0, 100.0), &mut host).unwrap();
    assert_eq!(host.logical_pages(), vec![-3, -2]);
    assert_eq!(host.physical_pages(), vec![2, 3]);
    assert_eq!(host.element_at_offset(0), Some(&"page 2".to_string()));
}

#[test]
fn duplicated_pages_get_distinct_slots() {
    let rule = PagerTestRule::new();
    let config = LoopPagerConfig::default()
        .with_content_padding(PaddingValues::from_components(40.0, 0.0, 0.0, 0.0));
    let mut pager = horizontal_pager(&rule, 2, config);
    let mut host = RecordingLayoutHost::new();
    let result = pager.layout(Constraints::loose(200.0, 400.0), &mut host).unwrap();

    assert_eq!(result.layout.page_size, 160);
    assert_eq!(host.logical_pages(), vec![-1, 0, 1]);
    assert_eq!(host.physical_pages(), vec![1, 0, 1]);
    assert_eq!(host.slot_keys(), vec![1, 0, 3]);
    assert_eq!(host.main_axis_offsets(), vec![-120, 40, 200]);
    assert_eq!(pager.item_provider().item_count(), 4);
    let elements: Vec<_> = host.elements().into_iter().cloned().collect();
    assert_eq!(elements, vec!["page 1", "page 0", "page 1"]);
}

#[test]
fn vertical_pager_lays_out_along_y() {
    let rule = PagerTestRule::new();
    let state = LoopPagerState::new(3, 1).unwrap();
    let config = LoopPagerConfig::default().with_aspect_ratio(0.5);
    let mut pager = LoopPager::vertical(state, config, rule.clock(), |page| page).unwrap();
    let mut host = RecordingLayoutHost::new();
    let result = pager.layout(Constraints::loose(400.0, 300.0), &mut host).unwrap();

    assert_eq!((result.width, result.height), (150, 300));
    let positions: Vec<_> = host.placements().iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(positions, vec![(0, 0), (0, 300)]);
    assert_eq!(host.elements(), vec![&1, &2]);
}

#[test]
fn scroll_to_page_is_exact() {
    let rule = PagerTestRule::new();
    let pager = horizontal_pager(&rule, 5, LoopPagerConfig::default());
    pager.scroll_to_page(-12);
    assert_settled_on(pager.state(), -12);
    assert_eq!(pager.state().current_physical_page(), 3);
}

#[test]
fn animate_scroll_to_page_commits_target_and_lands_exactly() {
    let rule = PagerTestRule::new();
    let mut pager = horizontal_pager(&rule, 5, LoopPagerConfig::default());
    pager
        .layout(Constraints::loose(100.0, 100.0), &mut RecordingLayoutHost::new())
        .unwrap();

    let job = pager.animate_scroll_to_page(7);
    assert_eq!(pager.state().target_page(), 7);
    assert_eq!(pager.state().settled_page(), 0);
    assert_eq!(pager.state().phase(), ScrollPhase::Animating);
    assert!(pager.state().is_scroll_in_progress());

    rule.advance_until_idle();
    assert_eq!(job.outcome(), Some(ScrollOutcome::Completed));
    assert_settled_on(pager.state(), 7);
}

#[test]
fn animate_before_layout_jumps() {
    let rule = PagerTestRule::new();
    let pager = horizontal_pager(&rule, 5, LoopPagerConfig::default());
    let job = pager.animate_scroll_to_page(3);
    assert_eq!(job.outcome(), Some(ScrollOutcome::Completed));
    assert!(!rule.has_pending_frames());
    assert_settled_on(pager.state(), 3);
}

#[test]
fn drag_preempts_programmatic_animation() {
    let rule = PagerTestRule::new();
    let mut pager = horizontal_pager(&rule, 5, LoopPagerConfig::default());
    pager
        .layout(Constraints::loose(100.0, 100.0), &mut RecordingLayoutHost::new())
        .unwrap();

    let job = pager.animate_scroll_to_page(3);
    rule.advance_frames(4);
    let position = pager.state().page();
    assert!(position > 0.0 && position < 3.0, "position {position}");

    assert!(pager.drag_start(Instant::now()));
    assert_eq!(pager.state().phase(), ScrollPhase::Dragging);
    assert_eq!(pager.state().target_page(), pager.state().current_page());
    rule.advance_frame();
    assert_eq!(job.outcome(), Some(ScrollOutcome::Cancelled));
    assert_eq!(pager.state().page(), position);
    assert!(pager.is_dragging());

    let settle = pager.release_with_velocity(0.0);
    rule.advance_until_idle();
    assert_eq!(settle.outcome(), Some(ScrollOutcome::Completed));
    assert_settled_on(pager.state(), position.round() as i32);
}

#[test]
fn programmatic_scroll_is_refused_during_drag() {
    let rule = PagerTestRule::new();
    let mut pager = horizontal_pager(&rule, 5, LoopPagerConfig::default());
    pager
        .layout(Constraints::loose(100.0, 100.0), &mut RecordingLayoutHost::new())
        .unwrap();

    let start = Instant::now();
    pager.drag_by(-20.0, start);
    let job = pager.animate_scroll_to_page(4);
    assert_eq!(job.outcome(), Some(ScrollOutcome::Cancelled));
    assert_eq!(pager.state().target_page(), 0);
    assert!(pager.is_dragging());
}

#[test]
fn disabled_user_scroll_still_allows_programmatic_scroll() {
    let rule = PagerTestRule::new();
    let config = LoopPagerConfig::default().with_user_scroll_enabled(false);
    let mut pager = horizontal_pager(&rule, 5, config);
    pager
        .layout(Constraints::loose(100.0, 100.0), &mut RecordingLayoutHost::new())
        .unwrap();

    let start = Instant::now();
    assert!(!pager.drag_start(start));
    assert_eq!(pager.drag_by(-50.0, start), 0.0);
    assert_eq!(pager.state().page(), 0.0);

    pager.animate_scroll_to_page(2);
    rule.advance_until_idle();
    assert_settled_on(pager.state(), 2);

    pager.set_user_scroll_enabled(true);
    assert_eq!(pager.drag_by(-50.0, start), -50.0);
}

#[test]
fn saved_page_restores_without_fraction() {
    let rule = PagerTestRule::new();
    let mut pager = horizontal_pager(&rule, 5, LoopPagerConfig::default());
    pager
        .layout(Constraints::loose(100.0, 100.0), &mut RecordingLayoutHost::new())
        .unwrap();
    pager.drag_by(-640.0, Instant::now());

    let saver = LoopPagerSaver::new(5);
    let saved = saver.save(pager.state());
    assert_eq!(saved, 6);
    let restored = saver.restore(saved).unwrap();
    assert_settled_on(&restored, 6);
}

#[test]
fn unbounded_constraints_fail_layout() {
    let rule = PagerTestRule::new();
    let mut pager = horizontal_pager(&rule, 5, LoopPagerConfig::default());
    let mut host = RecordingLayoutHost::new();
    assert!(pager
        .layout(Constraints::loose(f32::INFINITY, 100.0), &mut host)
        .is_err());
    assert!(host.placed().is_empty());
}
