use super::input_state::InputState;
use super::world::WorldConfig;

/// Advances the player one tick. Frozen while the popup is open; opposite
/// directions cancel.
pub(crate) fn step_player(
    position_x: f32,
    input: &InputState,
    config: &WorldConfig,
    popup_open: bool,
) -> f32 {
    if popup_open {
        return position_x;
    }

    let mut next_x = position_x;
    if input.move_left_held() {
        next_x -= config.player_speed;
    }
    if input.move_right_held() {
        next_x += config.player_speed;
    }
    clamp_player_x(next_x, config)
}

pub(crate) fn clamp_player_x(position_x: f32, config: &WorldConfig) -> f32 {
    position_x.min(config.max_player_x()).max(0.0)
}

/// Left edge of the visible window in world pixels, centred on the player where
/// the world allows.
pub(crate) fn camera_x(position_x: f32, config: &WorldConfig) -> f32 {
    (position_x - config.viewport_width / 2.0)
        .min(config.max_camera_x())
        .max(0.0)
}
