mod input_state;
mod interaction;
mod movement;
mod proximity;
mod scene_impl;
mod state;
mod world;

use explorer_engine::Scene;

pub(crate) use world::{
    load_world_config, WorldConfigError, WorldError, WorldModel, WORLD_CONFIG_FILE_NAME,
};

pub(crate) fn build_scene(world: WorldModel) -> Box<dyn Scene> {
    Box::new(scene_impl::ExplorationScene::new(world))
}

#[cfg(test)]
mod tests;
