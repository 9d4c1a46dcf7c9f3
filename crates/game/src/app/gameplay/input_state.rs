use explorer_engine::{KeyId, KEY_COUNT};

/// Held keys plus the edge-triggered interaction request.
#[derive(Debug, Clone, Default)]
pub(crate) struct InputState {
    held: [bool; KEY_COUNT],
    interaction_pressed: bool,
}

impl InputState {
    pub(crate) fn set_key_held(&mut self, key: KeyId, held: bool) {
        self.held[key.index()] = held;
    }

    pub(crate) fn is_held(&self, key: KeyId) -> bool {
        self.held[key.index()]
    }

    pub(crate) fn move_left_held(&self) -> bool {
        self.any_held(KeyId::is_move_left)
    }

    pub(crate) fn move_right_held(&self) -> bool {
        self.any_held(KeyId::is_move_right)
    }

    /// Records a fresh interaction press. Auto-repeat never counts.
    pub(crate) fn press_interaction(&mut self, repeat: bool) {
        if !repeat {
            self.interaction_pressed = true;
        }
    }

    /// True at most once per recorded press.
    pub(crate) fn consume_interaction_press(&mut self) -> bool {
        std::mem::take(&mut self.interaction_pressed)
    }

    fn any_held(&self, in_group: fn(KeyId) -> bool) -> bool {
        KeyId::ALL
            .into_iter()
            .any(|key| in_group(key) && self.is_held(key))
    }
}
