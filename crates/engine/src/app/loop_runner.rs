use std::env;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowBuilder};

use super::frame_pump::{FramePump, TickScheduler};
use super::metrics::MetricsAccumulator;
use super::{KeyId, Renderer, Scene, Viewport};

pub const SLOW_FRAME_ENV_VAR: &str = "EXPLORER_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Mesopotamia Explorer".to_string(),
            window_width: 800,
            window_height: 450,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(5),
            simulated_slow_frame_ms: 0,
            max_render_fps: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

struct WindowScheduler<'a> {
    window: &'a Window,
}

impl TickScheduler for WindowScheduler<'_> {
    fn request_next_tick(&mut self) {
        self.window.request_redraw();
    }
}

pub fn run_app(config: LoopConfig, mut scene: Box<dyn Scene>) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let viewport = Viewport {
        width: config.window_width.max(1),
        height: config.window_height.max(1),
    };
    let mut renderer =
        Renderer::new(Arc::clone(&window), viewport).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Wait);

    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(5));
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let slow_frame_delay = resolve_slow_frame_delay(config.simulated_slow_frame_ms);
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);
    let mut pump = FramePump::new(
        config.target_tps.max(1),
        max_frame_delta,
        config.max_ticks_per_frame.max(1),
    );
    let mut pointer = PointerState::default();

    scene.load();
    info!(
        target_tps = config.target_tps.max(1),
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame = config.max_ticks_per_frame.max(1),
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
        render_fps_cap = %format_render_cap(effective_render_cap),
        "loop_config"
    );

    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics = MetricsAccumulator::new(metrics_log_interval, Instant::now());
    let mut last_applied_title: Option<String> = None;
    window.request_redraw();

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    pointer.set_cursor_position_px(position.x as f32, position.y as f32);
                }
                WindowEvent::CursorLeft { .. } => pointer.clear_cursor_position(),
                WindowEvent::MouseInput { state, button, .. } => {
                    if let Some(cursor) = pointer.take_left_click(button, state) {
                        if renderer.close_control_hit(cursor) {
                            scene.activate_close_control();
                        }
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    let Some(key) = key_id_from_physical(event.physical_key) else {
                        return;
                    };
                    match event.state {
                        ElementState::Pressed => scene.key_down(key, event.repeat),
                        ElementState::Released => scene.key_up(key),
                    }
                }
                WindowEvent::RedrawRequested => {
                    if slow_frame_delay > Duration::ZERO {
                        // Debug perturbation only; not the FPS cap.
                        thread::sleep(slow_frame_delay);
                    }

                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    let elapsed_since_last_present =
                        now.saturating_duration_since(last_present_instant);
                    let cap_sleep =
                        compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    let mut scheduler = WindowScheduler {
                        window: window.as_ref(),
                    };
                    let plan = match pump.pump(
                        raw_frame_dt,
                        scene.as_mut(),
                        &mut renderer,
                        &mut scheduler,
                    ) {
                        Ok(plan) => plan,
                        Err(error) => {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                            return;
                        }
                    };
                    last_present_instant = Instant::now();

                    if plan.dropped_backlog > Duration::ZERO {
                        warn!(
                            dropped_backlog_ms = plan.dropped_backlog.as_millis() as u64,
                            max_ticks_per_frame = config.max_ticks_per_frame,
                            "sim_clamp_triggered"
                        );
                    }

                    let next_title = scene.debug_title();
                    if next_title != last_applied_title {
                        match &next_title {
                            Some(title) => window.set_title(title),
                            None => window.set_title(&config.window_title),
                        }
                        last_applied_title = next_title;
                    }

                    metrics.record_frame(raw_frame_dt, plan.ticks_to_run, plan.dropped_backlog);
                    if let Some(snapshot) = metrics.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            worst_frame_time_ms = snapshot.worst_frame_time_ms,
                            dropped_backlog_ms = snapshot.dropped_backlog_ms,
                            ticks_total = pump.ticks_total(),
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::LoopExiting => {
                scene.unload();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Cursor tracking for the popup close control. Keyboard input bypasses this and
/// goes straight to the scene.
#[derive(Debug, Default)]
struct PointerState {
    cursor_position_px: Option<(f32, f32)>,
    left_mouse_is_down: bool,
}

impl PointerState {
    fn set_cursor_position_px(&mut self, x: f32, y: f32) {
        self.cursor_position_px = Some((x, y));
    }

    fn clear_cursor_position(&mut self) {
        self.cursor_position_px = None;
    }

    /// Returns the cursor position on the press edge of a left click.
    fn take_left_click(
        &mut self,
        button: MouseButton,
        state: ElementState,
    ) -> Option<(f32, f32)> {
        if button != MouseButton::Left {
            return None;
        }
        match state {
            ElementState::Pressed => {
                let was_down = self.left_mouse_is_down;
                self.left_mouse_is_down = true;
                if was_down {
                    None
                } else {
                    self.cursor_position_px
                }
            }
            ElementState::Released => {
                self.left_mouse_is_down = false;
                None
            }
        }
    }
}

fn key_id_from_physical(key: PhysicalKey) -> Option<KeyId> {
    match key {
        PhysicalKey::Code(KeyCode::ArrowLeft) => Some(KeyId::ArrowLeft),
        PhysicalKey::Code(KeyCode::ArrowRight) => Some(KeyId::ArrowRight),
        PhysicalKey::Code(KeyCode::KeyA) => Some(KeyId::KeyA),
        PhysicalKey::Code(KeyCode::KeyD) => Some(KeyId::KeyD),
        PhysicalKey::Code(KeyCode::KeyE) => Some(KeyId::KeyE),
        PhysicalKey::Code(KeyCode::Space) => Some(KeyId::Space),
        PhysicalKey::Code(KeyCode::Enter) | PhysicalKey::Code(KeyCode::NumpadEnter) => {
            Some(KeyId::Enter)
        }
        PhysicalKey::Code(KeyCode::Escape) => Some(KeyId::Escape),
        _ => None,
    }
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

fn resolve_slow_frame_delay(config_slow_frame_ms: u64) -> Duration {
    match env::var(SLOW_FRAME_ENV_VAR) {
        Ok(value) => parse_slow_frame_ms(&value).unwrap_or_else(|| {
            warn!(
                env_var = SLOW_FRAME_ENV_VAR,
                value = value.as_str(),
                "invalid slow-frame env var value; falling back to config"
            );
            Duration::from_millis(config_slow_frame_ms)
        }),
        Err(env::VarError::NotPresent) => Duration::from_millis(config_slow_frame_ms),
        Err(err) => {
            warn!(
                env_var = SLOW_FRAME_ENV_VAR,
                error = %err,
                "unable to read slow-frame env var; falling back to config"
            );
            Duration::from_millis(config_slow_frame_ms)
        }
    }
}

fn parse_slow_frame_ms(raw: &str) -> Option<Duration> {
    raw.trim().parse::<u64>().ok().map(Duration::from_millis)
}
