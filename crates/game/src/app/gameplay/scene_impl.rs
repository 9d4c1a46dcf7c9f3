use explorer_engine::{FrameView, KeyId, Scene};
use tracing::{debug, info};

use super::interaction::InteractionEvent;
use super::state::GameState;
use super::world::{ArtifactId, WorldModel};

/// The explorer as the engine loop sees it. `load` rebuilds play state from the
/// startup world so a reload starts from zero found.
pub(crate) struct ExplorationScene {
    initial_world: WorldModel,
    state: GameState,
}

impl ExplorationScene {
    pub(crate) fn new(world: WorldModel) -> Self {
        Self {
            state: GameState::new(world.clone()),
            initial_world: world,
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &GameState {
        &self.state
    }

    fn artifact_name(&self, id: Option<ArtifactId>) -> &str {
        id.and_then(|id| self.state.world().artifact(id))
            .map(|artifact| artifact.name.as_str())
            .unwrap_or("none")
    }

    fn log_interaction(&self, event: InteractionEvent) {
        match event {
            InteractionEvent::Opened {
                artifact,
                found,
                total,
            } => {
                let name = self.artifact_name(Some(artifact));
                let kind = self
                    .state
                    .world()
                    .artifact(artifact)
                    .map(|artifact| artifact.type_id.as_str())
                    .unwrap_or("none");
                info!(artifact = %name, kind = %kind, "popup_opened");
                info!(artifact = %name, found, total, "artifact_collected");
                if found == total {
                    info!(total, "all_artifacts_found");
                }
            }
            InteractionEvent::Closed {
                artifact,
                found,
                total,
            } => {
                info!(
                    artifact = %self.artifact_name(artifact),
                    found,
                    total,
                    "popup_closed"
                );
            }
        }
    }
}

impl Scene for ExplorationScene {
    fn load(&mut self) {
        self.state = GameState::new(self.initial_world.clone());
        let config = self.state.world().config();
        info!(
            artifacts = self.state.total_artifacts(),
            world_width = config.world_width,
            viewport_width = config.viewport_width,
            spawn_x = self.state.player_x(),
            "scene_loaded"
        );
    }

    fn key_down(&mut self, key: KeyId, repeat: bool) {
        if let Some(event) = self.state.key_down(key, repeat) {
            self.log_interaction(event);
        }
    }

    fn key_up(&mut self, key: KeyId) {
        self.state.key_up(key);
    }

    fn activate_close_control(&mut self) {
        if let Some(event) = self.state.close_popup() {
            self.log_interaction(event);
        }
    }

    fn tick(&mut self) {
        if let Some(change) = self.state.tick() {
            debug!(
                previous = %self.artifact_name(change.previous),
                current = %self.artifact_name(change.current),
                player_x = self.state.player_x(),
                "active_artifact_changed"
            );
        }
    }

    fn frame_view(&self) -> FrameView {
        self.state.view()
    }

    fn unload(&mut self) {
        info!(
            found = self.state.found_count(),
            total = self.state.total_artifacts(),
            "scene_unloaded"
        );
    }

    fn debug_title(&self) -> Option<String> {
        Some(format!(
            "Mesopotamia Explorer | x {:.0} | camera {:.0} | found {} / {}",
            self.state.player_x(),
            self.state.camera_x(),
            self.state.found_count(),
            self.state.total_artifacts()
        ))
    }
}
