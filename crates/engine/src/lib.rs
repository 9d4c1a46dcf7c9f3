use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod content;

pub use app::{
    run_app, world_to_screen_x, AppError, FramePump, FrameView, KeyId, LoopConfig,
    LoopMetricsSnapshot, ManualScheduler, MarkerView, PopupView, RenderSink, Renderer, Scene,
    StepPlan, TickScheduler, Viewport, KEY_COUNT, SLOW_FRAME_ENV_VAR,
};
pub use content::{
    load_scene_description, parse_scene_description, ArtifactDef, ArtifactMarker,
    ContentErrorCode, SceneContentError, SceneDescription, SourceLocation,
};

pub const ROOT_ENV_VAR: &str = "EXPLORER_ROOT";
pub const SCENE_FILE_NAME: &str = "scene.xml";

/// Where the game finds its content. `root` is the directory holding `assets/`.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub base_content_dir: PathBuf,
}

impl AppPaths {
    pub fn scene_file(&self) -> PathBuf {
        self.base_content_dir.join(SCENE_FILE_NAME)
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("{var} is not valid unicode: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("cannot locate the running executable: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("cannot read the working directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error("{var}={path} has no assets/base/{scene}", scene = SCENE_FILE_NAME)]
    InvalidEnvRoot { var: &'static str, path: PathBuf },
    #[error(
        "no assets/base/{scene} found above {exe_dir} or in {cwd}; \
point {var} at the directory that contains assets/",
        scene = SCENE_FILE_NAME
    )]
    ContentNotFound {
        exe_dir: PathBuf,
        cwd: PathBuf,
        var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = locate_content_root()?;
    Ok(app_paths_for_root(root))
}

pub fn app_paths_for_root(root: PathBuf) -> AppPaths {
    let base_content_dir = root.join("assets").join("base");
    AppPaths {
        root,
        base_content_dir,
    }
}

/// `EXPLORER_ROOT` wins when set. Otherwise the executable's ancestors are
/// searched (covers `target/debug/...` inside a checkout), then the working
/// directory.
fn locate_content_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let root = canonical_or_raw(Path::new(&value));
            if has_scene_content(&root) {
                Ok(root)
            } else {
                Err(StartupError::InvalidEnvRoot {
                    var: ROOT_ENV_VAR,
                    path: root,
                })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe.parent().unwrap_or(Path::new("/")).to_path_buf();
            if let Some(root) = exe_dir.ancestors().find(|dir| has_scene_content(dir)) {
                return Ok(canonical_or_raw(root));
            }

            let cwd = env::current_dir().map_err(StartupError::CurrentDir)?;
            if has_scene_content(&cwd) {
                return Ok(canonical_or_raw(&cwd));
            }

            Err(StartupError::ContentNotFound {
                exe_dir,
                cwd,
                var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn has_scene_content(dir: &Path) -> bool {
    app_paths_for_root(dir.to_path_buf()).scene_file().is_file()
}

fn canonical_or_raw(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_without_scene_is_not_a_content_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(!has_scene_content(dir.path()));

        fs::create_dir_all(dir.path().join("assets").join("base")).expect("content dir");
        assert!(!has_scene_content(dir.path()));
    }

    #[test]
    fn directory_with_scene_file_is_a_content_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let base = dir.path().join("assets").join("base");
        fs::create_dir_all(&base).expect("content dir");
        fs::write(base.join(SCENE_FILE_NAME), "<Scene/>").expect("write scene");

        assert!(has_scene_content(dir.path()));
    }

    #[test]
    fn scene_file_lives_under_base_content_dir() {
        let paths = app_paths_for_root(PathBuf::from("/game"));
        assert_eq!(paths.base_content_dir, PathBuf::from("/game/assets/base"));
        assert_eq!(
            paths.scene_file(),
            PathBuf::from("/game/assets/base/scene.xml")
        );
    }

    #[test]
    fn not_found_error_names_the_override_variable() {
        let error = StartupError::ContentNotFound {
            exe_dir: PathBuf::from("/opt/explorer/bin"),
            cwd: PathBuf::from("/tmp"),
            var: ROOT_ENV_VAR,
        };
        let text = error.to_string();
        assert!(text.contains("EXPLORER_ROOT"), "{text}");
        assert!(text.contains("assets/base/scene.xml"), "{text}");
    }
}
