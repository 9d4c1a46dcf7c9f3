use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use tracing::debug;
use winit::window::Window;

use crate::app::{FrameView, MarkerView, RenderSink};

use super::layout::{ScreenLayout, ARTIFACT_SIZE, PLAYER_HEIGHT};
use super::text::{
    draw_filled_rect, draw_rect_outline, draw_text_clipped, text_width_px, wrap_text, LINE_ADVANCE,
    TEXT_SCALE,
};
use super::transform::{span_visible, world_to_screen_x};
use super::Viewport;

const SKY_COLOR: [u8; 4] = [232, 206, 160, 255];
const GROUND_COLOR: [u8; 4] = [176, 134, 84, 255];
const WORLD_EDGE_COLOR: [u8; 4] = [92, 64, 38, 255];
const PLAYER_COLOR: [u8; 4] = [40, 84, 160, 255];
const ARTIFACT_COLOR: [u8; 4] = [196, 150, 40, 255];
const ARTIFACT_COLLECTED_COLOR: [u8; 4] = [150, 138, 116, 255];
const ARTIFACT_ACTIVE_OUTLINE_COLOR: [u8; 4] = [255, 250, 210, 255];
const HUD_TEXT_COLOR: [u8; 4] = [44, 30, 18, 255];
const POPUP_BG_COLOR: [u8; 4] = [250, 242, 224, 255];
const POPUP_BORDER_COLOR: [u8; 4] = [92, 64, 38, 255];
const POPUP_TITLE_COLOR: [u8; 4] = [120, 52, 20, 255];
const POPUP_TEXT_COLOR: [u8; 4] = [44, 30, 18, 255];
const CLOSE_CONTROL_COLOR: [u8; 4] = [160, 60, 40, 255];
const CLOSE_CONTROL_LABEL: &str = "X";
const WORLD_EDGE_WIDTH: i32 = 2;

/// Software presenter: draws a [`FrameView`] into a fixed-size pixel buffer that
/// `pixels` scales onto the window surface.
pub struct Renderer {
    _window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    layout: ScreenLayout,
}

impl Renderer {
    pub fn new(window: Arc<Window>, viewport: Viewport) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let pixels = Pixels::new(viewport.width, viewport.height, surface)?;
        Ok(Self {
            _window: window,
            pixels,
            viewport,
            layout: ScreenLayout::for_viewport(viewport),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height).map_err(Error::from)
    }

    /// True when a window-space cursor position lands on the popup close control.
    pub fn close_control_hit(&self, cursor_px: (f32, f32)) -> bool {
        match self.pixels.window_pos_to_pixel(cursor_px) {
            Ok((x, y)) => self.layout.close_control.contains(x as i32, y as i32),
            Err(_) => false,
        }
    }
}

impl RenderSink for Renderer {
    type Error = Error;

    fn present(&mut self, view: &FrameView) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }
        draw_frame(self.pixels.frame_mut(), self.viewport, &self.layout, view);
        self.pixels.render()
    }
}

pub(crate) fn draw_frame(
    frame: &mut [u8],
    viewport: Viewport,
    layout: &ScreenLayout,
    view: &FrameView,
) {
    let (width, height) = (viewport.width, viewport.height);
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&SKY_COLOR);
    }
    draw_filled_rect(
        frame,
        width,
        height,
        0,
        layout.ground_y,
        width as i32,
        height as i32 - layout.ground_y,
        GROUND_COLOR,
    );
    draw_world_edges(frame, viewport, layout, view);

    for marker in &view.markers {
        draw_marker(frame, viewport, layout, view.world_offset_x, marker);
    }

    let player_x = view.player_screen_x.round() as i32;
    draw_filled_rect(
        frame,
        width,
        height,
        player_x,
        layout.ground_y - PLAYER_HEIGHT,
        view.player_width.round() as i32,
        PLAYER_HEIGHT,
        PLAYER_COLOR,
    );

    let (message_x, message_y) = layout.hud_line_origin(0);
    draw_text_clipped(
        frame,
        width,
        height,
        message_x,
        message_y,
        &view.message,
        HUD_TEXT_COLOR,
    );
    let (counter_x, counter_y) = layout.hud_line_origin(1);
    draw_text_clipped(
        frame,
        width,
        height,
        counter_x,
        counter_y,
        &view.found_counter,
        HUD_TEXT_COLOR,
    );

    if let Some(popup) = view.popup.as_ref() {
        draw_popup(frame, viewport, layout, &popup.title, &popup.body);
    }
}

fn draw_world_edges(
    frame: &mut [u8],
    viewport: Viewport,
    layout: &ScreenLayout,
    view: &FrameView,
) {
    let left_edge = world_to_screen_x(0.0, view.world_offset_x);
    let right_edge = world_to_screen_x(view.world_width, view.world_offset_x);
    for edge_x in [left_edge - WORLD_EDGE_WIDTH, right_edge] {
        if span_visible(edge_x, WORLD_EDGE_WIDTH, viewport) {
            draw_filled_rect(
                frame,
                viewport.width,
                viewport.height,
                edge_x,
                0,
                WORLD_EDGE_WIDTH,
                layout.ground_y,
                WORLD_EDGE_COLOR,
            );
        }
    }
}

fn draw_marker(
    frame: &mut [u8],
    viewport: Viewport,
    layout: &ScreenLayout,
    world_offset_x: f32,
    marker: &MarkerView,
) {
    let screen_x = world_to_screen_x(marker.world_x, world_offset_x);
    if !span_visible(screen_x, ARTIFACT_SIZE, viewport) {
        return;
    }
    let top = layout.ground_y - ARTIFACT_SIZE;
    let color = if marker.collected {
        ARTIFACT_COLLECTED_COLOR
    } else {
        ARTIFACT_COLOR
    };
    draw_filled_rect(
        frame,
        viewport.width,
        viewport.height,
        screen_x,
        top,
        ARTIFACT_SIZE,
        ARTIFACT_SIZE,
        color,
    );
    if marker.active {
        draw_rect_outline(
            frame,
            viewport.width,
            viewport.height,
            screen_x - 2,
            top - 2,
            ARTIFACT_SIZE + 4,
            ARTIFACT_SIZE + 4,
            ARTIFACT_ACTIVE_OUTLINE_COLOR,
        );
    }
}

fn draw_popup(
    frame: &mut [u8],
    viewport: Viewport,
    layout: &ScreenLayout,
    title: &str,
    body: &str,
) {
    let (width, height) = (viewport.width, viewport.height);
    let panel = layout.popup_panel;
    draw_filled_rect(
        frame,
        width,
        height,
        panel.left,
        panel.top,
        panel.width,
        panel.height,
        POPUP_BG_COLOR,
    );
    draw_rect_outline(
        frame,
        width,
        height,
        panel.left,
        panel.top,
        panel.width,
        panel.height,
        POPUP_BORDER_COLOR,
    );

    let (title_x, title_y) = layout.popup_title_origin;
    draw_text_clipped(
        frame,
        width,
        height,
        title_x,
        title_y,
        title,
        POPUP_TITLE_COLOR,
    );

    let (body_x, mut body_y) = layout.popup_body_origin;
    let lines = wrap_text(body, layout.popup_body_max_chars);
    if lines.len() > layout.popup_body_max_lines {
        debug!(
            lines = lines.len(),
            max_lines = layout.popup_body_max_lines,
            "popup_body_truncated"
        );
    }
    for line in lines.iter().take(layout.popup_body_max_lines) {
        draw_text_clipped(frame, width, height, body_x, body_y, line, POPUP_TEXT_COLOR);
        body_y += LINE_ADVANCE;
    }

    let close = layout.close_control;
    draw_rect_outline(
        frame,
        width,
        height,
        close.left,
        close.top,
        close.width,
        close.height,
        CLOSE_CONTROL_COLOR,
    );
    let label_x = close.left + (close.width - text_width_px(CLOSE_CONTROL_LABEL)) / 2 + 1;
    let label_y = close.top + (close.height - 5 * TEXT_SCALE) / 2;
    draw_text_clipped(
        frame,
        width,
        height,
        label_x,
        label_y,
        CLOSE_CONTROL_LABEL,
        CLOSE_CONTROL_COLOR,
    );
}
