use super::text::{GLYPH_ADVANCE, LINE_ADVANCE};
use super::Viewport;

pub(crate) const HUD_PADDING: i32 = 12;
pub(crate) const GROUND_HEIGHT: i32 = 90;
pub(crate) const PLAYER_HEIGHT: i32 = 48;
pub(crate) const ARTIFACT_SIZE: i32 = 24;
const POPUP_MARGIN_X: i32 = 80;
const POPUP_MARGIN_Y: i32 = 70;
const POPUP_INSET: i32 = 16;
const CLOSE_CONTROL_SIZE: i32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenRect {
    pub(crate) fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.top + self.height
    }
}

/// Fixed screen geometry for one viewport size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScreenLayout {
    pub ground_y: i32,
    pub popup_panel: ScreenRect,
    pub close_control: ScreenRect,
    pub popup_title_origin: (i32, i32),
    pub popup_body_origin: (i32, i32),
    pub popup_body_max_chars: usize,
    pub popup_body_max_lines: usize,
}

impl ScreenLayout {
    pub(crate) fn for_viewport(viewport: Viewport) -> Self {
        let width = viewport.width as i32;
        let height = viewport.height as i32;
        let ground_y = (height - GROUND_HEIGHT).max(0);

        let popup_panel = ScreenRect {
            left: POPUP_MARGIN_X.min(width / 4),
            top: POPUP_MARGIN_Y.min(height / 4),
            width: (width - 2 * POPUP_MARGIN_X.min(width / 4)).max(0),
            height: (height - 2 * POPUP_MARGIN_Y.min(height / 4)).max(0),
        };
        let close_control = ScreenRect {
            left: popup_panel.left + popup_panel.width - POPUP_INSET / 2 - CLOSE_CONTROL_SIZE,
            top: popup_panel.top + POPUP_INSET / 2,
            width: CLOSE_CONTROL_SIZE,
            height: CLOSE_CONTROL_SIZE,
        };
        let popup_title_origin = (
            popup_panel.left + POPUP_INSET,
            popup_panel.top + POPUP_INSET,
        );
        let popup_body_origin = (
            popup_title_origin.0,
            popup_title_origin.1 + LINE_ADVANCE * 2,
        );
        let body_width = popup_panel.width - 2 * POPUP_INSET;
        let body_height = popup_panel.top + popup_panel.height - POPUP_INSET - popup_body_origin.1;

        Self {
            ground_y,
            popup_panel,
            close_control,
            popup_title_origin,
            popup_body_origin,
            popup_body_max_chars: (body_width / GLYPH_ADVANCE).max(1) as usize,
            popup_body_max_lines: (body_height / LINE_ADVANCE).max(1) as usize,
        }
    }

    pub(crate) fn hud_line_origin(&self, line: i32) -> (i32, i32) {
        (HUD_PADDING, HUD_PADDING + line * LINE_ADVANCE)
    }
}
