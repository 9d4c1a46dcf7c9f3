/// Keys the explorer reacts to, identified by physical position so Shift and
/// Caps Lock never change the mapping. Anything else is dropped at the window
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyId {
    ArrowLeft,
    ArrowRight,
    KeyA,
    KeyD,
    KeyE,
    Space,
    Enter,
    Escape,
}

pub const KEY_COUNT: usize = 8;

impl KeyId {
    pub const ALL: [KeyId; KEY_COUNT] = [
        KeyId::ArrowLeft,
        KeyId::ArrowRight,
        KeyId::KeyA,
        KeyId::KeyD,
        KeyId::KeyE,
        KeyId::Space,
        KeyId::Enter,
        KeyId::Escape,
    ];

    pub const fn index(self) -> usize {
        match self {
            KeyId::ArrowLeft => 0,
            KeyId::ArrowRight => 1,
            KeyId::KeyA => 2,
            KeyId::KeyD => 3,
            KeyId::KeyE => 4,
            KeyId::Space => 5,
            KeyId::Enter => 6,
            KeyId::Escape => 7,
        }
    }

    pub const fn is_move_left(self) -> bool {
        matches!(self, KeyId::ArrowLeft | KeyId::KeyA)
    }

    pub const fn is_move_right(self) -> bool {
        matches!(self, KeyId::ArrowRight | KeyId::KeyD)
    }

    pub const fn is_interact(self) -> bool {
        matches!(self, KeyId::KeyE)
    }

    pub const fn is_close(self) -> bool {
        matches!(self, KeyId::Space | KeyId::Enter | KeyId::Escape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_unique() {
        for (expected, key) in KeyId::ALL.iter().enumerate() {
            assert_eq!(key.index(), expected);
        }
    }

    #[test]
    fn key_groups_do_not_overlap() {
        for key in KeyId::ALL {
            let groups = [
                key.is_move_left(),
                key.is_move_right(),
                key.is_interact(),
                key.is_close(),
            ];
            assert_eq!(groups.iter().filter(|hit| **hit).count(), 1, "{key:?}");
        }
    }
}
