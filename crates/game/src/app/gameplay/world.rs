use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use explorer_engine::SceneDescription;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub(crate) const WORLD_CONFIG_FILE_NAME: &str = "world.json";

/// World geometry in pixels. Every field falls back to the shipped value when
/// `world.json` omits it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WorldConfig {
    pub(crate) world_width: f32,
    pub(crate) viewport_width: f32,
    pub(crate) player_width: f32,
    pub(crate) player_speed: f32,
    pub(crate) proximity_threshold: f32,
    pub(crate) player_spawn_x: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_width: 2400.0,
            viewport_width: 800.0,
            player_width: 32.0,
            player_speed: 4.0,
            proximity_threshold: 60.0,
            player_spawn_x: 100.0,
        }
    }
}

impl WorldConfig {
    pub(crate) fn max_player_x(&self) -> f32 {
        self.world_width - self.player_width
    }

    pub(crate) fn max_camera_x(&self) -> f32 {
        self.world_width - self.viewport_width
    }

    pub(crate) fn validate(&self) -> Result<(), WorldConfigError> {
        for (field, value) in [
            ("world_width", self.world_width),
            ("viewport_width", self.viewport_width),
            ("player_width", self.player_width),
            ("player_speed", self.player_speed),
            ("proximity_threshold", self.proximity_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(WorldConfigError::Invalid {
                    field,
                    message: format!("must be finite and > 0, got {value}"),
                });
            }
        }
        if self.viewport_width > self.world_width {
            return Err(WorldConfigError::Invalid {
                field: "viewport_width",
                message: format!(
                    "{} is wider than world_width {}",
                    self.viewport_width, self.world_width
                ),
            });
        }
        if self.player_width > self.world_width {
            return Err(WorldConfigError::Invalid {
                field: "player_width",
                message: format!(
                    "{} is wider than world_width {}",
                    self.player_width, self.world_width
                ),
            });
        }
        if !self.player_spawn_x.is_finite()
            || self.player_spawn_x < 0.0
            || self.player_spawn_x > self.max_player_x()
        {
            return Err(WorldConfigError::Invalid {
                field: "player_spawn_x",
                message: format!(
                    "expected 0..={}, got {}",
                    self.max_player_x(),
                    self.player_spawn_x
                ),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub(crate) enum WorldConfigError {
    #[error("failed to read world config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse world config {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid world config field {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Reads `world.json` if present; a missing file means defaults.
pub(crate) fn load_world_config(path: &Path) -> Result<WorldConfig, WorldConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "world_config_defaulted");
            let config = WorldConfig::default();
            config.validate()?;
            return Ok(config);
        }
        Err(source) => {
            return Err(WorldConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = parse_world_config_json(&raw).map_err(|message| WorldConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })?;
    config.validate()?;
    info!(
        path = %path.display(),
        world_width = config.world_width,
        viewport_width = config.viewport_width,
        "world_config_loaded"
    );
    Ok(config)
}

fn parse_world_config_json(raw: &str) -> Result<WorldConfig, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, WorldConfig>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let source = error.into_inner();
        if path.is_empty() || path == "." {
            format!("parse world json: {source}")
        } else {
            format!("parse world json at {path}: {source}")
        }
    })
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum WorldError {
    #[error("artifact '{type_id}' has no definition")]
    UnknownArtifactType { type_id: String },
    #[error("artifact '{type_id}' at x={x} lies beyond the world's right edge ({world_width})")]
    MarkerBeyondWorld {
        type_id: String,
        x: f32,
        world_width: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ArtifactId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Artifact {
    pub(crate) id: ArtifactId,
    pub(crate) type_id: String,
    pub(crate) world_x: f32,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) collected: bool,
}

/// Geometry plus the artifact registry in marker order. Built once at startup;
/// only the `collected` flags change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WorldModel {
    config: WorldConfig,
    artifacts: Vec<Artifact>,
}

impl WorldModel {
    pub(crate) fn build(
        config: WorldConfig,
        description: &SceneDescription,
    ) -> Result<Self, WorldError> {
        let mut artifacts = Vec::with_capacity(description.markers.len());
        for (index, marker) in description.markers.iter().enumerate() {
            let def =
                description
                    .def(&marker.type_id)
                    .ok_or_else(|| WorldError::UnknownArtifactType {
                        type_id: marker.type_id.clone(),
                    })?;
            if marker.x > config.world_width {
                return Err(WorldError::MarkerBeyondWorld {
                    type_id: marker.type_id.clone(),
                    x: marker.x,
                    world_width: config.world_width,
                });
            }
            artifacts.push(Artifact {
                id: ArtifactId(index),
                type_id: marker.type_id.clone(),
                world_x: marker.x,
                name: def.name.clone(),
                description: def.description.clone(),
                collected: false,
            });
        }
        Ok(Self { config, artifacts })
    }

    pub(crate) fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub(crate) fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub(crate) fn artifact(&self, id: ArtifactId) -> Option<&Artifact> {
        self.artifacts.get(id.0)
    }

    pub(crate) fn total_artifacts(&self) -> usize {
        self.artifacts.len()
    }

    /// Flips `collected` once. Returns false when the artifact was already
    /// collected or does not exist.
    pub(crate) fn mark_collected(&mut self, id: ArtifactId) -> bool {
        match self.artifacts.get_mut(id.0) {
            Some(artifact) if !artifact.collected => {
                artifact.collected = true;
                true
            }
            _ => false,
        }
    }
}
