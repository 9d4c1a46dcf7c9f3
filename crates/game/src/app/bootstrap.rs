use explorer_engine::{
    load_scene_description, resolve_app_paths, LoopConfig, Scene, SceneContentError,
    StartupError,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::gameplay::{self, WorldConfigError, WorldError, WorldModel, WORLD_CONFIG_FILE_NAME};

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Paths(#[from] StartupError),
    #[error(transparent)]
    WorldConfig(#[from] WorldConfigError),
    #[error(transparent)]
    SceneContent(#[from] SceneContentError),
    #[error("failed to build world: {0}")]
    World(#[from] WorldError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "startup");

    let paths = resolve_app_paths()?;
    info!(
        root = %paths.root.display(),
        content = %paths.base_content_dir.display(),
        "app_paths_resolved"
    );
    let world_config =
        gameplay::load_world_config(&paths.base_content_dir.join(WORLD_CONFIG_FILE_NAME))?;
    let description = load_scene_description(&paths.scene_file())?;
    let world = WorldModel::build(world_config, &description)?;

    let config = LoopConfig {
        window_width: world_config.viewport_width.round() as u32,
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        scene: gameplay::build_scene(world),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
