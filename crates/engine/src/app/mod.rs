mod frame_pump;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod view;

pub use frame_pump::{FramePump, ManualScheduler, StepPlan, TickScheduler};
pub use input::{KeyId, KEY_COUNT};
pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{world_to_screen_x, Renderer, Viewport};
pub use scene::Scene;
pub use view::{FrameView, MarkerView, PopupView, RenderSink};
