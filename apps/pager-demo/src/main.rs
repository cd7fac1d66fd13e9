use anyhow::{ensure, Context, Result};
use loop_pager_animation::{AnimationSpec, Easing};
use loop_pager_core::{FrameClock, FRAME_NANOS};
use loop_pager_foundation::{LoopPagerState, ScrollJob, SnapDistance};
use loop_pager_ui::{Constraints, LoopPager, LoopPagerConfig, PagePlacement, PaddingValues};
use web_time::{Duration, Instant};

const PAGES: [&str; 4] = ["sunrise", "harbor", "forest", "night"];
const VIEWPORT: (f32, f32) = (360.0, 640.0);
const MAX_FRAMES: usize = 2_000;

/// Pumps frames until nothing is scheduled.
struct FramePump {
    clock: FrameClock,
    time_nanos: u64,
}

impl FramePump {
    fn new(clock: FrameClock) -> Self {
        Self {
            clock,
            time_nanos: 0,
        }
    }

    fn run_until_idle(&mut self) -> Result<usize> {
        let mut frames = 0;
        while self.clock.has_frame_callbacks() {
            ensure!(frames < MAX_FRAMES, "animation did not settle in {MAX_FRAMES} frames");
            self.clock.drain_frame_callbacks(self.time_nanos);
            self.time_nanos += FRAME_NANOS;
            frames += 1;
        }
        Ok(frames)
    }
}

fn init_logging() {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn print_layout(pager: &mut LoopPager<&'static str>) -> Result<()> {
    let mut line = Vec::new();
    let result = pager.layout(
        Constraints::loose(VIEWPORT.0, VIEWPORT.1),
        &mut |placement: &PagePlacement, title: &'static str| {
            line.push(format!(
                "{title}@{}(page {})",
                placement.offset_main, placement.slot.logical_page
            ));
        },
    )?;
    println!(
        "  {}x{} visible {:?}: {}",
        result.width,
        result.height,
        result.visible_range,
        line.join(" ")
    );
    Ok(())
}

fn finish(
    label: &str,
    job: ScrollJob,
    pump: &mut FramePump,
    pager: &mut LoopPager<&'static str>,
) -> Result<()> {
    let frames = pump.run_until_idle()?;
    let state = pager.state();
    println!(
        "{label}: {:?} after {frames} frames, settled on {} (physical {})",
        job.outcome(),
        state.settled_page(),
        state.current_physical_page()
    );
    print_layout(pager)
}

fn main() -> Result<()> {
    init_logging();

    let clock = FrameClock::new();
    let mut pump = FramePump::new(clock.clone());
    let state = LoopPagerState::new(PAGES.len(), 0).context("creating pager state")?;
    state.add_settled_page_listener(|page| log::info!("settled on page {page}"));

    let config = LoopPagerConfig::default()
        .with_content_padding(PaddingValues::horizontal(24.0))
        .with_page_spacing(12.0)
        .with_aspect_ratio(0.8)
        .with_snap_distance(SnapDistance::Bounded(2));
    let mut pager = LoopPager::horizontal(state, config, clock, |page| PAGES[page])
        .context("creating pager")?;

    println!("=== Loop Pager Demo ===");
    print_layout(&mut pager)?;

    // Slow drag of about one page backward, released below the fling threshold.
    let start = Instant::now();
    pager.drag_start(start);
    for step in 1..=16 {
        pager.drag_by(20.0, start + Duration::from_millis(step * 100));
    }
    let job = pager.release();
    finish("slow drag backward", job, &mut pump, &mut pager)?;

    // Quick flick forward; the snap distance caps it at two pages.
    let job = pager.release_with_velocity(-4000.0);
    finish("fast flick forward", job, &mut pump, &mut pager)?;

    let job = pager.animate_scroll_to_page_with(
        11,
        AnimationSpec::tween(450, Easing::FastOutSlowInEasing).into(),
    );
    finish("animate to page 11", job, &mut pump, &mut pager)?;

    pager.scroll_to_page(-5);
    println!("jump to page -5: settled on {}", pager.state().settled_page());
    print_layout(&mut pager)?;

    Ok(())
}
