/// Everything the presentation layer needs for one frame.
///
/// A view is built in one piece from scene state and handed to a [`RenderSink`]
/// as a whole, so a sink never observes a frame that is half old and half new.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    /// Player offset from the left edge of the viewport, in pixels.
    pub player_screen_x: f32,
    /// Horizontal translation applied to the world layer (`-camera_x`).
    pub world_offset_x: f32,
    pub player_width: f32,
    pub world_width: f32,
    pub message: String,
    pub popup: Option<PopupView>,
    pub found_counter: String,
    pub markers: Vec<MarkerView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupView {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerView {
    pub world_x: f32,
    pub collected: bool,
    pub active: bool,
}

impl FrameView {
    pub fn popup_visible(&self) -> bool {
        self.popup.is_some()
    }
}

pub trait RenderSink {
    type Error;

    fn present(&mut self, view: &FrameView) -> Result<(), Self::Error>;
}
