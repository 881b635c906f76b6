use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::input::InputSnapshot;
use super::metrics::{LoopMetricsSnapshot, MetricsAccumulator};
use super::rendering::{AtlasSet, BackgroundCache, ComposedFrame, FrameCompositor};
use super::simulation::{SimState, StepReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacingDecision {
    /// Under budget: wait this long before running the frame.
    Sleep(Duration),
    /// At or over budget: run now. The overrun is only reported.
    OverBudget { overrun: Duration },
}

pub fn target_frame_duration(target_fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / target_fps.max(1) as f64)
}

pub fn plan_pacing(elapsed: Duration, target: Duration) -> PacingDecision {
    if elapsed < target {
        PacingDecision::Sleep(target - elapsed)
    } else {
        PacingDecision::OverBudget {
            overrun: elapsed - target,
        }
    }
}

/// Throttles iterations to a target rate by sleeping off the remainder of
/// each frame budget. Never skips or catches up frames.
#[derive(Debug)]
pub struct FramePacer {
    target: Duration,
    last: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacedFrame {
    pub elapsed: Duration,
    pub decision: PacingDecision,
}

impl FramePacer {
    pub fn new(target_fps: u32) -> Self {
        Self {
            target: target_frame_duration(target_fps),
            last: Instant::now(),
        }
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    pub fn pace(&mut self) -> PacedFrame {
        let elapsed = Instant::now().saturating_duration_since(self.last);
        let decision = plan_pacing(elapsed, self.target);
        if let PacingDecision::Sleep(remaining) = decision {
            thread::sleep(remaining);
        }
        self.last = Instant::now();
        PacedFrame { elapsed, decision }
    }
}

#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub target_fps: u32,
    pub metrics_log_interval: Duration,
    pub slow_frame_delay: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            metrics_log_interval: Duration::from_secs(1),
            slow_frame_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug)]
pub enum Iteration {
    Quit,
    Frame {
        frame: ComposedFrame,
        report: StepReport,
    },
}

/// Owns the simulation and render state and runs one paced iteration at a time.
pub struct TimestepDriver {
    state: SimState,
    atlases: AtlasSet,
    background: BackgroundCache,
    compositor: FrameCompositor,
    pacer: FramePacer,
    metrics: MetricsAccumulator,
    slow_frame_delay: Duration,
    last_metrics: Option<LoopMetricsSnapshot>,
}

impl TimestepDriver {
    pub fn new(state: SimState, atlases: AtlasSet, config: &DriverConfig) -> Self {
        let background = BackgroundCache::build(state.tilemap(), &atlases);
        let metrics_interval = if config.metrics_log_interval.is_zero() {
            Duration::from_secs(1)
        } else {
            config.metrics_log_interval
        };
        Self {
            state,
            atlases,
            background,
            compositor: FrameCompositor::default(),
            pacer: FramePacer::new(config.target_fps),
            metrics: MetricsAccumulator::new(metrics_interval),
            slow_frame_delay: config.slow_frame_delay,
            last_metrics: None,
        }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn background(&self) -> &BackgroundCache {
        &self.background
    }

    pub fn frame_size(&self) -> (u32, u32) {
        let pixels = self.background.pixels();
        (pixels.width(), pixels.height())
    }

    pub fn last_metrics(&self) -> Option<LoopMetricsSnapshot> {
        self.last_metrics
    }

    pub fn over_budget_frames(&self) -> u64 {
        self.metrics.over_budget_total()
    }

    /// Paces, then runs the fixed update/render sequence.
    pub fn run_iteration(&mut self, input: &InputSnapshot) -> Iteration {
        if self.slow_frame_delay > Duration::ZERO {
            // Explicit debug perturbation only; this is not the frame cap.
            thread::sleep(self.slow_frame_delay);
        }

        let paced = self.pacer.pace();
        let over_budget = matches!(paced.decision, PacingDecision::OverBudget { .. });
        if let PacingDecision::OverBudget { overrun } = paced.decision {
            warn!(
                overrun_ms = overrun.as_secs_f64() * 1000.0,
                budget_ms = self.pacer.target().as_secs_f64() * 1000.0,
                "frame_over_budget"
            );
        }
        self.metrics.record_frame(paced.elapsed, over_budget);
        if let Some(snapshot) = self.metrics.maybe_snapshot(Instant::now()) {
            info!(
                fps = snapshot.fps,
                frame_time_ms = snapshot.frame_time_ms,
                over_budget_frames = snapshot.over_budget_frames,
                over_budget_total = snapshot.over_budget_total,
                "loop_metrics"
            );
            self.last_metrics = Some(snapshot);
        }

        self.advance(input)
    }

    /// One iteration without pacing: quit check, tick, update, compose.
    pub fn advance(&mut self, input: &InputSnapshot) -> Iteration {
        if input.quit_requested() {
            return Iteration::Quit;
        }
        let report = self.state.step(input);
        let frame = self
            .compositor
            .compose(&self.background, &self.state, &self.atlases);
        Iteration::Frame { frame, report }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::rendering::atlas::test_support::solid_atlases;
    use crate::app::{InputAction, Tick, Tilemap, Vec2};

    fn driver() -> TimestepDriver {
        let atlases = solid_atlases(4);
        let tilemap = Tilemap::with_tiles(20, 20, [(5, 5, 1)]).expect("tilemap");
        let state = SimState::new(tilemap, Vec2::new(15.0, 15.0), 0.12, atlases.entity_layout())
            .expect("state");
        TimestepDriver::new(state, atlases, &DriverConfig::default())
    }

    #[test]
    fn target_frame_duration_for_60hz_is_expected() {
        let duration = target_frame_duration(60);
        assert!((duration.as_secs_f64() - (1.0 / 60.0)).abs() < 0.000_001);
    }

    #[test]
    fn zero_fps_is_treated_as_one() {
        assert_eq!(target_frame_duration(0), Duration::from_secs(1));
    }

    #[test]
    fn pacing_sleeps_remaining_budget_when_early() {
        let decision = plan_pacing(Duration::from_millis(5), Duration::from_millis(16));
        assert_eq!(decision, PacingDecision::Sleep(Duration::from_millis(11)));
    }

    #[test]
    fn pacing_reports_overrun_without_sleeping() {
        let decision = plan_pacing(Duration::from_millis(20), Duration::from_millis(16));
        assert_eq!(
            decision,
            PacingDecision::OverBudget {
                overrun: Duration::from_millis(4)
            }
        );
        assert!(matches!(
            plan_pacing(Duration::from_millis(16), Duration::from_millis(16)),
            PacingDecision::OverBudget { .. }
        ));
    }

    #[test]
    fn pacer_waits_out_the_frame_budget() {
        let mut pacer = FramePacer::new(100);
        pacer.pace();
        let started = Instant::now();
        let paced = pacer.pace();
        assert!(matches!(paced.decision, PacingDecision::Sleep(_)));
        assert!(started.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn quit_stops_before_the_tick_advances() {
        let mut driver = driver();
        let input = InputSnapshot::empty().with_action_pressed(InputAction::Quit, true);

        assert!(matches!(driver.advance(&input), Iteration::Quit));
        assert_eq!(driver.state().tick(), Tick::START);
    }

    #[test]
    fn each_iteration_ticks_once_and_emits_full_frame() {
        let mut driver = driver();
        let input = InputSnapshot::empty().with_action_down(InputAction::MoveLeft, true);

        let Iteration::Frame { frame, report } = driver.advance(&input) else {
            panic!("expected frame");
        };

        assert_eq!(report.tick, Tick::from_raw(2));
        assert_eq!(driver.frame_size(), (80, 80));
        assert_eq!(frame.pixels.width(), 80);
        assert_eq!(frame.pixels.height(), 80);
        assert!((driver.state().entity().position.x - 14.88).abs() < 0.0001);
    }

    #[test]
    fn background_is_not_modified_by_frames() {
        let mut driver = driver();
        let before = driver.background().clone();
        for _ in 0..5 {
            driver.advance(&InputSnapshot::empty().with_action_down(InputAction::Act, true));
        }
        assert_eq!(driver.background(), &before);
    }

    #[test]
    fn run_iteration_paces_and_counts_frames() {
        let mut driver = driver();
        for _ in 0..3 {
            assert!(matches!(
                driver.run_iteration(&InputSnapshot::empty()),
                Iteration::Frame { .. }
            ));
        }
        assert_eq!(driver.state().tick(), Tick::from_raw(4));
    }
}
