#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Maps a world-space x coordinate into the viewport given the world layer's
/// translation (`-camera_x`). World units are pixels, so no scaling applies.
pub fn world_to_screen_x(world_x: f32, world_offset_x: f32) -> i32 {
    (world_x + world_offset_x).round() as i32
}

pub(crate) fn span_visible(screen_x: i32, span_width: i32, viewport: Viewport) -> bool {
    screen_x.saturating_add(span_width) > 0 && screen_x < viewport.width as i32
}
