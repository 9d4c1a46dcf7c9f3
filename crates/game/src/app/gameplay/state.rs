use explorer_engine::{FrameView, KeyId, MarkerView, PopupView};

use super::input_state::InputState;
use super::interaction::{counter_text, InteractionController, InteractionEvent};
use super::movement::{camera_x, clamp_player_x, step_player};
use super::proximity::{nearest_artifact, status_message};
use super::world::{Artifact, ArtifactId, WorldModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ActiveArtifactChange {
    pub(crate) previous: Option<ArtifactId>,
    pub(crate) current: Option<ArtifactId>,
}

/// Owns every piece of mutable game state. Key handlers and `tick` are the only
/// mutation paths; `view` is a pure read.
#[derive(Debug, Clone)]
pub(crate) struct GameState {
    world: WorldModel,
    input: InputState,
    player_x: f32,
    interaction: InteractionController,
    message: String,
}

impl GameState {
    pub(crate) fn new(world: WorldModel) -> Self {
        let player_x = clamp_player_x(world.config().player_spawn_x, world.config());
        Self {
            world,
            input: InputState::default(),
            player_x,
            interaction: InteractionController::default(),
            message: status_message(None),
        }
    }

    pub(crate) fn world(&self) -> &WorldModel {
        &self.world
    }

    pub(crate) fn player_x(&self) -> f32 {
        self.player_x
    }

    pub(crate) fn camera_x(&self) -> f32 {
        camera_x(self.player_x, self.world.config())
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn is_popup_open(&self) -> bool {
        self.interaction.is_open()
    }

    pub(crate) fn active_artifact(&self) -> Option<ArtifactId> {
        self.interaction.active_artifact()
    }

    pub(crate) fn found_count(&self) -> usize {
        self.interaction.found_count()
    }

    pub(crate) fn total_artifacts(&self) -> usize {
        self.world.total_artifacts()
    }

    /// While the popup is open only close keys act; other keys are recorded as
    /// held so release events stay balanced, but never move or interact.
    pub(crate) fn key_down(&mut self, key: KeyId, repeat: bool) -> Option<InteractionEvent> {
        if self.interaction.is_open() {
            if key.is_close() {
                return self.close_popup();
            }
            self.input.set_key_held(key, true);
            return None;
        }

        self.input.set_key_held(key, true);
        if key.is_interact() {
            self.input.press_interaction(repeat);
            if self.input.consume_interaction_press() {
                return self.open_active_artifact();
            }
        }
        None
    }

    pub(crate) fn key_up(&mut self, key: KeyId) {
        self.input.set_key_held(key, false);
    }

    /// Close keys and the pointer close control both land here. No-op while
    /// exploring.
    pub(crate) fn close_popup(&mut self) -> Option<InteractionEvent> {
        let event = self.interaction.close(&self.world)?;
        self.message = event.message().to_string();
        Some(event)
    }

    /// One fixed simulation step: movement, then proximity. Returns the active
    /// artifact change, if one was committed.
    pub(crate) fn tick(&mut self) -> Option<ActiveArtifactChange> {
        let popup_open = self.interaction.is_open();
        self.player_x = step_player(
            self.player_x,
            &self.input,
            self.world.config(),
            popup_open,
        );

        let nearest = nearest_artifact(
            self.player_x,
            self.world.artifacts(),
            self.world.config().proximity_threshold,
        );
        if popup_open {
            return None;
        }

        self.message = status_message(self.artifact(nearest));
        let previous = self.interaction.active_artifact();
        if self.interaction.set_active_artifact(nearest) {
            Some(ActiveArtifactChange {
                previous,
                current: nearest,
            })
        } else {
            None
        }
    }

    pub(crate) fn view(&self) -> FrameView {
        let camera_x = self.camera_x();
        let active = self.interaction.active_artifact();
        let popup = if self.interaction.is_open() {
            self.artifact(active).map(|artifact| PopupView {
                title: artifact.name.clone(),
                body: artifact.description.clone(),
            })
        } else {
            None
        };

        FrameView {
            player_screen_x: self.player_x - camera_x,
            world_offset_x: -camera_x,
            player_width: self.world.config().player_width,
            world_width: self.world.config().world_width,
            message: self.message.clone(),
            popup,
            found_counter: counter_text(self.found_count(), self.total_artifacts()),
            markers: self
                .world
                .artifacts()
                .iter()
                .map(|artifact| MarkerView {
                    world_x: artifact.world_x,
                    collected: artifact.collected,
                    active: active == Some(artifact.id),
                })
                .collect(),
        }
    }

    fn open_active_artifact(&mut self) -> Option<InteractionEvent> {
        let event = self.interaction.try_open(&mut self.world)?;
        self.message = event.message().to_string();
        Some(event)
    }

    fn artifact(&self, id: Option<ArtifactId>) -> Option<&Artifact> {
        id.and_then(|id| self.world.artifact(id))
    }

    #[cfg(test)]
    pub(crate) fn place_player(&mut self, position_x: f32) {
        self.player_x = clamp_player_x(position_x, self.world.config());
    }
}
