mod scene_description;

pub use scene_description::{
    load_scene_description, parse_scene_description, ArtifactDef, ArtifactMarker,
    ContentErrorCode, SceneContentError, SceneDescription, SourceLocation,
};
