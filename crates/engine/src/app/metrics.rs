use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    pub worst_frame_time_ms: f32,
    pub dropped_backlog_ms: u64,
}

/// Rolls frame and tick counts over a fixed interval for the periodic
/// `loop_metrics` log line.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    ticks: u32,
    frame_time_sum: Duration,
    worst_frame_time: Duration,
    dropped_backlog: Duration,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval_start: now,
            interval,
            frames: 0,
            ticks: 0,
            frame_time_sum: Duration::ZERO,
            worst_frame_time: Duration::ZERO,
            dropped_backlog: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration, ticks: u32, dropped: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.ticks = self.ticks.saturating_add(ticks);
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
        self.worst_frame_time = self.worst_frame_time.max(frame_dt);
        self.dropped_backlog = self.dropped_backlog.saturating_add(dropped);
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
            tps: self.ticks as f32 / elapsed_seconds,
            frame_time_ms,
            worst_frame_time_ms: self.worst_frame_time.as_secs_f32() * 1000.0,
            dropped_backlog_ms: self.dropped_backlog.as_millis() as u64,
        };

        *self = Self::new(self.interval, now);
        Some(snapshot)
    }
}
