use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub over_budget_frames: u32,
    pub over_budget_total: u64,
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    frame_time_sum: Duration,
    over_budget_frames: u32,
    over_budget_total: u64,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self::starting_at(Instant::now(), interval)
    }

    pub(crate) fn starting_at(start: Instant, interval: Duration) -> Self {
        Self {
            interval_start: start,
            interval,
            frames: 0,
            frame_time_sum: Duration::ZERO,
            over_budget_frames: 0,
            over_budget_total: 0,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration, over_budget: bool) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
        if over_budget {
            self.over_budget_frames = self.over_budget_frames.saturating_add(1);
            self.over_budget_total = self.over_budget_total.saturating_add(1);
        }
    }

    pub(crate) fn over_budget_total(&self) -> u64 {
        self.over_budget_total
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = if self.frames == 0 {
            0.0
        } else {
            (self.frame_time_sum.as_secs_f32() / self.frames as f32) * 1000.0
        };

        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            frame_time_ms,
            over_budget_frames: self.over_budget_frames,
            over_budget_total: self.over_budget_total,
        };

        self.interval_start = now;
        self.frames = 0;
        self.frame_time_sum = Duration::ZERO;
        self.over_budget_frames = 0;

        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_computes_expected_values() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::starting_at(base, Duration::from_secs(1));

        accumulator.record_frame(Duration::from_millis(16), false);
        accumulator.record_frame(Duration::from_millis(16), false);
        accumulator.record_frame(Duration::from_millis(22), true);

        let snapshot = accumulator
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("snapshot should be emitted");

        assert!((snapshot.fps - 3.0).abs() < 0.05);
        assert!((snapshot.frame_time_ms - 18.0).abs() < 0.001);
        assert_eq!(snapshot.over_budget_frames, 1);
        assert_eq!(snapshot.over_budget_total, 1);
    }

    #[test]
    fn snapshot_not_emitted_before_interval() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::starting_at(base, Duration::from_secs(1));
        accumulator.record_frame(Duration::from_millis(16), false);

        assert!(accumulator
            .maybe_snapshot(base + Duration::from_millis(500))
            .is_none());
    }

    #[test]
    fn interval_counters_reset_but_total_persists() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::starting_at(base, Duration::from_secs(1));
        accumulator.record_frame(Duration::from_millis(40), true);
        accumulator
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("first");

        accumulator.record_frame(Duration::from_millis(10), false);
        let second = accumulator
            .maybe_snapshot(base + Duration::from_secs(2))
            .expect("second");

        assert_eq!(second.over_budget_frames, 0);
        assert_eq!(second.over_budget_total, 1);
        assert_eq!(accumulator.over_budget_total(), 1);
    }
}
