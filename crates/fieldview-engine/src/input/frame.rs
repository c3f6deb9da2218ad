use std::collections::HashSet;

use super::types::Key;

/// Keys that went down since the update slot last ran.
///
/// Held state lives in `InputState`. Edge-triggered actions (reload, debug
/// cycling) read `pressed` here, so a held or auto-repeating key fires once
/// per physical press without anyone clearing held state.
///
/// The runtime clears it right after the update slot runs, and only then.
#[derive(Debug, Default)]
pub struct InputFrame {
    went_down: HashSet<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.went_down.clear();
    }

    pub fn mark_down(&mut self, key: Key) {
        self.went_down.insert(key);
    }

    /// `key` went down this frame.
    pub fn pressed(&self, key: Key) -> bool {
        self.went_down.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.went_down.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_marked_keys_are_pressed() {
        let mut frame = InputFrame::default();
        frame.mark_down(Key::F1);

        assert!(frame.pressed(Key::F1));
        assert!(!frame.pressed(Key::F5));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut frame = InputFrame::default();
        frame.mark_down(Key::F5);
        frame.mark_down(Key::W);
        assert!(!frame.is_empty());

        frame.clear();

        assert!(frame.is_empty());
        assert!(!frame.pressed(Key::F5));
    }
}
