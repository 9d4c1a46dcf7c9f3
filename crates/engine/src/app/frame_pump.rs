use std::time::Duration;

use super::scene::Scene;
use super::view::RenderSink;

/// Requests the next frame callback. The window implementation asks winit for a
/// redraw; tests count requests and step by hand.
pub trait TickScheduler {
    fn request_next_tick(&mut self);
}

#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// Consumes one outstanding request, if any.
    pub fn take_pending(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }
}

impl TickScheduler for ManualScheduler {
    fn request_next_tick(&mut self) {
        self.pending = self.pending.saturating_add(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    pub ticks_to_run: u32,
    pub remaining_accumulator: Duration,
    pub dropped_backlog: Duration,
}

/// Fixed-step driver: turns wall-clock frame deltas into whole simulation ticks,
/// then presents exactly one view and schedules the next frame.
#[derive(Debug)]
pub struct FramePump {
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    accumulator: Duration,
    ticks_total: u64,
}

impl FramePump {
    pub fn new(target_tps: u32, max_frame_delta: Duration, max_ticks_per_frame: u32) -> Self {
        Self {
            fixed_dt: Duration::from_secs_f64(1.0 / target_tps.max(1) as f64),
            max_frame_delta,
            max_ticks_per_frame: max_ticks_per_frame.max(1),
            accumulator: Duration::ZERO,
            ticks_total: 0,
        }
    }

    pub fn fixed_dt(&self) -> Duration {
        self.fixed_dt
    }

    pub fn ticks_total(&self) -> u64 {
        self.ticks_total
    }

    /// Runs however many ticks `raw_frame_dt` pays for, presents the resulting
    /// view and requests the next frame. A sink error skips the reschedule so the
    /// loop stops instead of drawing from a broken presenter.
    pub fn pump<R: RenderSink>(
        &mut self,
        raw_frame_dt: Duration,
        scene: &mut dyn Scene,
        sink: &mut R,
        scheduler: &mut dyn TickScheduler,
    ) -> Result<StepPlan, R::Error> {
        let clamped_frame_dt = clamp_frame_delta(raw_frame_dt, self.max_frame_delta);
        self.accumulator = self.accumulator.saturating_add(clamped_frame_dt);

        let plan = plan_sim_steps(self.accumulator, self.fixed_dt, self.max_ticks_per_frame);
        for _ in 0..plan.ticks_to_run {
            scene.tick();
            self.ticks_total = self.ticks_total.saturating_add(1);
        }
        self.accumulator = plan.remaining_accumulator;

        sink.present(&scene.frame_view())?;
        scheduler.request_next_tick();
        Ok(plan)
    }

    /// Exactly one tick and one present, independent of wall time.
    pub fn step<R: RenderSink>(
        &mut self,
        scene: &mut dyn Scene,
        sink: &mut R,
        scheduler: &mut dyn TickScheduler,
    ) -> Result<(), R::Error> {
        scene.tick();
        self.ticks_total = self.ticks_total.saturating_add(1);
        sink.present(&scene.frame_view())?;
        scheduler.request_next_tick();
        Ok(())
    }
}

pub(crate) fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

pub(crate) fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{FrameView, KeyId};

    #[derive(Default)]
    struct CountingScene {
        ticks: u32,
    }

    impl Scene for CountingScene {
        fn load(&mut self) {}
        fn key_down(&mut self, _key: KeyId, _repeat: bool) {}
        fn key_up(&mut self, _key: KeyId) {}
        fn activate_close_control(&mut self) {}
        fn tick(&mut self) {
            self.ticks += 1;
        }
        fn frame_view(&self) -> FrameView {
            FrameView {
                player_screen_x: self.ticks as f32,
                world_offset_x: 0.0,
                player_width: 32.0,
                world_width: 2400.0,
                message: String::new(),
                popup: None,
                found_counter: String::new(),
                markers: Vec::new(),
            }
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        presented: Vec<FrameView>,
        fail: bool,
    }

    impl RenderSink for RecordingSink {
        type Error = &'static str;

        fn present(&mut self, view: &FrameView) -> Result<(), Self::Error> {
            if self.fail {
                return Err("sink failed");
            }
            self.presented.push(view.clone());
            Ok(())
        }
    }

    fn pump_at_60() -> FramePump {
        FramePump::new(60, Duration::from_millis(250), 5)
    }

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(250);
        assert_eq!(
            clamp_frame_delta(Duration::from_millis(600), max_frame_delta),
            max_frame_delta
        );
    }

    #[test]
    fn plan_sim_steps_runs_expected_ticks_without_drop() {
        let result = plan_sim_steps(Duration::from_millis(48), Duration::from_millis(16), 5);

        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn plan_sim_steps_drops_backlog_when_tick_cap_hit() {
        let result = plan_sim_steps(Duration::from_millis(120), Duration::from_millis(16), 3);

        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::from_millis(72));
    }

    #[test]
    fn pump_runs_paid_ticks_then_presents_once_and_reschedules() {
        let mut pump = pump_at_60();
        let mut scene = CountingScene::default();
        let mut sink = RecordingSink::default();
        let mut scheduler = ManualScheduler::new();

        let two_ticks = pump.fixed_dt() * 2;

        let plan = pump
            .pump(two_ticks, &mut scene, &mut sink, &mut scheduler)
            .expect("pump");

        assert_eq!(plan.ticks_to_run, 2);
        assert_eq!(scene.ticks, 2);
        assert_eq!(pump.ticks_total(), 2);
        assert_eq!(sink.presented.len(), 1);
        assert_eq!(sink.presented[0].player_screen_x, 2.0);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn short_frames_accumulate_until_a_tick_is_paid() {
        let mut pump = pump_at_60();
        let mut scene = CountingScene::default();
        let mut sink = RecordingSink::default();
        let mut scheduler = ManualScheduler::new();
        let half = pump.fixed_dt() / 2 + Duration::from_micros(1);

        pump.pump(half, &mut scene, &mut sink, &mut scheduler)
            .expect("first");
        assert_eq!(scene.ticks, 0);
        pump.pump(half, &mut scene, &mut sink, &mut scheduler)
            .expect("second");
        assert_eq!(scene.ticks, 1);
        assert_eq!(sink.presented.len(), 2);
    }

    #[test]
    fn sink_failure_stops_rescheduling() {
        let mut pump = pump_at_60();
        let mut scene = CountingScene::default();
        let mut sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let mut scheduler = ManualScheduler::new();

        let result = pump.step(&mut scene, &mut sink, &mut scheduler);

        assert!(result.is_err());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn manual_scheduler_drives_single_steps() {
        let mut pump = pump_at_60();
        let mut scene = CountingScene::default();
        let mut sink = RecordingSink::default();
        let mut scheduler = ManualScheduler::new();
        scheduler.request_next_tick();

        let mut frames = 0;
        while frames < 4 && scheduler.take_pending() {
            pump.step(&mut scene, &mut sink, &mut scheduler)
                .expect("step");
            frames += 1;
        }

        assert_eq!(scene.ticks, 4);
        assert_eq!(sink.presented.len(), 4);
        assert_eq!(scheduler.pending(), 1);
        assert!(scheduler.take_pending());
        assert!(!scheduler.take_pending());
    }
}
