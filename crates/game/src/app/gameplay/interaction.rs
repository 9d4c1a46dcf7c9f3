use super::proximity::EXPLORE_PROMPT;
use super::world::{ArtifactId, WorldModel};

pub(crate) const GREAT_DISCOVERY_MESSAGE: &str =
    "Great discovery! Keep exploring to find the remaining inventions.";
pub(crate) const ALL_FOUND_MESSAGE: &str =
    "You found all the key Mesopotamian inventions! Press Space or Enter to close.";
pub(crate) const MISSION_COMPLETE_MESSAGE: &str =
    "Mission complete! You uncovered how Mesopotamian inventions shaped our modern world.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct InteractionSession {
    pub(crate) is_open: bool,
    pub(crate) active_artifact: Option<ArtifactId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InteractionEvent {
    Opened {
        artifact: ArtifactId,
        found: usize,
        total: usize,
    },
    Closed {
        artifact: Option<ArtifactId>,
        found: usize,
        total: usize,
    },
}

impl InteractionEvent {
    /// Status line shown after the transition.
    pub(crate) fn message(&self) -> &'static str {
        match *self {
            Self::Opened { found, total, .. } if found == total => ALL_FOUND_MESSAGE,
            Self::Opened { .. } => GREAT_DISCOVERY_MESSAGE,
            Self::Closed { found, total, .. } if found == total => MISSION_COMPLETE_MESSAGE,
            Self::Closed { .. } => EXPLORE_PROMPT,
        }
    }
}

/// Exploring / popup-open state machine with the found counter.
#[derive(Debug, Clone, Default)]
pub(crate) struct InteractionController {
    session: InteractionSession,
    found_count: usize,
}

impl InteractionController {
    #[cfg(test)]
    pub(crate) fn session(&self) -> InteractionSession {
        self.session
    }

    pub(crate) fn is_open(&self) -> bool {
        self.session.is_open
    }

    pub(crate) fn active_artifact(&self) -> Option<ArtifactId> {
        self.session.active_artifact
    }

    pub(crate) fn found_count(&self) -> usize {
        self.found_count
    }

    /// Proximity result; ignored while the popup holds its artifact.
    pub(crate) fn set_active_artifact(&mut self, active: Option<ArtifactId>) -> bool {
        if self.session.is_open || self.session.active_artifact == active {
            return false;
        }
        self.session.active_artifact = active;
        true
    }

    /// Opens the popup on the active artifact if it has not been inspected yet.
    pub(crate) fn try_open(&mut self, world: &mut WorldModel) -> Option<InteractionEvent> {
        if self.session.is_open {
            return None;
        }
        let artifact = self.session.active_artifact?;
        if !world.mark_collected(artifact) {
            return None;
        }
        self.found_count += 1;
        self.session.is_open = true;
        Some(InteractionEvent::Opened {
            artifact,
            found: self.found_count,
            total: world.total_artifacts(),
        })
    }

    pub(crate) fn close(&mut self, world: &WorldModel) -> Option<InteractionEvent> {
        if !self.session.is_open {
            return None;
        }
        let artifact = self.session.active_artifact.take();
        self.session.is_open = false;
        Some(InteractionEvent::Closed {
            artifact,
            found: self.found_count,
            total: world.total_artifacts(),
        })
    }
}

pub(crate) fn counter_text(found: usize, total: usize) -> String {
    format!("Artifacts found: {found} / {total}")
}
