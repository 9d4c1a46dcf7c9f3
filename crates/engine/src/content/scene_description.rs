use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentErrorCode {
    ReadFile,
    XmlMalformed,
    InvalidRoot,
    UnknownElement,
    MissingAttribute,
    MissingText,
    InvalidValue,
    DuplicateDef,
    UnknownArtifactType,
}

#[derive(Debug, Clone)]
pub struct SceneContentError {
    pub code: ContentErrorCode,
    pub message: String,
    pub file_path: PathBuf,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for SceneContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{:?}: {} (file={}, line={}, column={})",
                self.code,
                self.message,
                self.file_path.display(),
                loc.line,
                loc.column
            ),
            None => write!(
                f,
                "{:?}: {} (file={})",
                self.code,
                self.message,
                self.file_path.display()
            ),
        }
    }
}

impl std::error::Error for SceneContentError {}

/// Descriptive text for one kind of artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDef {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// A placed artifact: which def it shows and where its left edge sits in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactMarker {
    pub type_id: String,
    pub x: f32,
}

/// Startup data for the explorer scene. Markers keep document order, which is
/// also the tie-break order for proximity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDescription {
    pub defs: Vec<ArtifactDef>,
    pub markers: Vec<ArtifactMarker>,
}

impl SceneDescription {
    pub fn def(&self, id: &str) -> Option<&ArtifactDef> {
        self.defs.iter().find(|def| def.id == id)
    }
}

pub fn load_scene_description(path: &Path) -> Result<SceneDescription, SceneContentError> {
    let raw = fs::read_to_string(path).map_err(|source| SceneContentError {
        code: ContentErrorCode::ReadFile,
        message: format!("failed to read scene file: {source}"),
        file_path: path.to_path_buf(),
        location: None,
    })?;
    let description = parse_scene_description(path, &raw)?;
    info!(
        path = %path.display(),
        defs = description.defs.len(),
        markers = description.markers.len(),
        "scene_description_loaded"
    );
    Ok(description)
}

/// Parses a `<Scene>` document of `<ArtifactDef id name>description</ArtifactDef>`
/// and `<Artifact type x/>` elements. Every marker must name a known def.
pub fn parse_scene_description(
    file_path: &Path,
    raw: &str,
) -> Result<SceneDescription, SceneContentError> {
    let doc = Document::parse(raw).map_err(|error| SceneContentError {
        code: ContentErrorCode::XmlMalformed,
        message: format!("malformed XML: {error}"),
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        }),
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "Scene" {
        return Err(error_at_node(
            ContentErrorCode::InvalidRoot,
            "root element must be <Scene>".to_string(),
            file_path,
            &doc,
            root,
        ));
    }

    let mut defs = Vec::<ArtifactDef>::new();
    let mut seen_def_ids = HashSet::<String>::new();
    let mut marker_nodes = Vec::<Node<'_, '_>>::new();

    for child in root.children().filter(|node| node.is_element()) {
        match child.tag_name().name() {
            "ArtifactDef" => {
                let def = parse_artifact_def(file_path, &doc, child)?;
                if !seen_def_ids.insert(def.id.clone()) {
                    return Err(error_at_node(
                        ContentErrorCode::DuplicateDef,
                        format!("duplicate ArtifactDef '{}'", def.id),
                        file_path,
                        &doc,
                        child,
                    ));
                }
                defs.push(def);
            }
            "Artifact" => marker_nodes.push(child),
            other => {
                return Err(error_at_node(
                    ContentErrorCode::UnknownElement,
                    format!("unsupported element <{other}>; expected <ArtifactDef> or <Artifact>"),
                    file_path,
                    &doc,
                    child,
                ))
            }
        }
    }

    let mut markers = Vec::with_capacity(marker_nodes.len());
    for node in marker_nodes {
        let marker = parse_artifact_marker(file_path, &doc, node)?;
        if !seen_def_ids.contains(&marker.type_id) {
            return Err(error_at_node(
                ContentErrorCode::UnknownArtifactType,
                format!(
                    "artifact type '{}' has no matching <ArtifactDef>",
                    marker.type_id
                ),
                file_path,
                &doc,
                node,
            ));
        }
        markers.push(marker);
    }

    Ok(SceneDescription { defs, markers })
}

fn parse_artifact_def(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<ArtifactDef, SceneContentError> {
    let id = required_attribute(file_path, doc, node, "id")?;
    let name = required_attribute(file_path, doc, node, "name")?;
    let description = node
        .descendants()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    if description.is_empty() {
        return Err(error_at_node(
            ContentErrorCode::MissingText,
            format!("<ArtifactDef id=\"{id}\"> must contain a description"),
            file_path,
            doc,
            node,
        ));
    }

    Ok(ArtifactDef {
        id,
        name,
        description,
    })
}

fn parse_artifact_marker(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<ArtifactMarker, SceneContentError> {
    let type_id = required_attribute(file_path, doc, node, "type")?;
    let raw_x = required_attribute(file_path, doc, node, "x")?;
    let x = raw_x.parse::<f32>().map_err(|_| {
        error_at_node(
            ContentErrorCode::InvalidValue,
            format!("x '{raw_x}' is not a valid number"),
            file_path,
            doc,
            node,
        )
    })?;
    if !x.is_finite() || x < 0.0 {
        return Err(error_at_node(
            ContentErrorCode::InvalidValue,
            format!("x must be finite and >= 0, got {raw_x}"),
            file_path,
            doc,
            node,
        ));
    }

    Ok(ArtifactMarker { type_id, x })
}

fn required_attribute(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    attribute: &str,
) -> Result<String, SceneContentError> {
    let value = node.attribute(attribute).map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(error_at_node(
            ContentErrorCode::MissingAttribute,
            format!(
                "<{}> requires a non-empty '{attribute}' attribute",
                node.tag_name().name()
            ),
            file_path,
            doc,
            node,
        ));
    }
    Ok(value.to_string())
}

fn error_at_node(
    code: ContentErrorCode,
    message: String,
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> SceneContentError {
    let pos = doc.text_pos_at(node.range().start);
    SceneContentError {
        code,
        message,
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: pos.row as usize,
            column: pos.col as usize,
        }),
    }
}
