use super::world::{Artifact, ArtifactId};

pub(crate) const EXPLORE_PROMPT: &str =
    "Explore Mesopotamia! Use <- -> or A/D to move. Press E near an object to inspect it.";

/// Nearest uncollected artifact strictly closer than `threshold`. Ties go to the
/// earlier artifact in registry order.
pub(crate) fn nearest_artifact(
    position_x: f32,
    artifacts: &[Artifact],
    threshold: f32,
) -> Option<ArtifactId> {
    let mut best_distance = threshold;
    let mut best = None;
    for artifact in artifacts.iter().filter(|artifact| !artifact.collected) {
        let distance = (position_x - artifact.world_x).abs();
        if distance < best_distance {
            best_distance = distance;
            best = Some(artifact.id);
        }
    }
    best
}

pub(crate) fn status_message(active: Option<&Artifact>) -> String {
    match active {
        Some(artifact) => format!("You see a {}. Press E to inspect it.", artifact.name),
        None => EXPLORE_PROMPT.to_string(),
    }
}
