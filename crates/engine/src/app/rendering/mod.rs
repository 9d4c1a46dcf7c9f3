mod layout;
mod renderer;
mod text;
mod transform;

pub use renderer::Renderer;
pub use transform::{world_to_screen_x, Viewport};
