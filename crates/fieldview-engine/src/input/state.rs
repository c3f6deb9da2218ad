use std::collections::HashMap;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyAction, KeyEvent, Modifiers};

/// Per-key record kept for the lifetime of the process.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeyState {
    pub pressed: bool,
    pub name: Option<&'static str>,
    pub description: Option<&'static str>,
}

/// Mapping from every [`Key`] to its [`KeyState`].
///
/// Built once with the full key set, so lookups never miss.
#[derive(Debug, Clone)]
pub struct KeyTable {
    entries: HashMap<Key, KeyState>,
}

impl KeyTable {
    pub fn new() -> Self {
        let entries = Key::ALL.iter().map(|&key| (key, blank(key))).collect();

        Self { entries }
    }

    pub fn get(&self, key: Key) -> KeyState {
        self.entries
            .get(&key)
            .copied()
            .unwrap_or_else(|| blank(key))
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.entries.get(&key).is_some_and(|s| s.pressed)
    }

    /// Marks `key` held. Returns `true` when this is a transition from up to down.
    pub fn press(&mut self, key: Key) -> bool {
        let state = self.entry(key);
        let was_up = !state.pressed;
        state.pressed = true;
        was_up
    }

    pub fn release(&mut self, key: Key) {
        self.entry(key).pressed = false;
    }

    pub fn release_all(&mut self) {
        for state in self.entries.values_mut() {
            state.pressed = false;
        }
    }

    /// `(name, description)` for every key that has a description, in help order.
    pub fn help(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        Key::ALL.iter().filter_map(|key| {
            let state = self.entries.get(key)?;
            Some((state.name?, state.description?))
        })
    }

    fn entry(&mut self, key: Key) -> &mut KeyState {
        self.entries.entry(key).or_insert_with(|| blank(key))
    }
}

fn blank(key: Key) -> KeyState {
    KeyState {
        pressed: false,
        name: key.name(),
        description: key.description(),
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Current input state for the surface.
///
/// Holds "is down" information, pointer position and the wheel total.
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Last pointer position in logical pixels.
    pub pointer: (f32, f32),

    /// Running wheel total as reported by the platform.
    pub scroll_total: f32,

    /// Held state for every key.
    pub keys: KeyTable,
}

impl InputState {
    /// Applies an input event to the current state and writes edges to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: &InputEvent) {
        match ev {
            InputEvent::Key(KeyEvent {
                key,
                action,
                modifiers,
                ..
            }) => {
                self.modifiers = *modifiers;

                match action {
                    KeyAction::Press => {
                        if self.keys.press(*key) {
                            frame.mark_down(*key);
                        }
                    }
                    KeyAction::Repeat => {
                        self.keys.press(*key);
                    }
                    KeyAction::Release => {
                        self.keys.release(*key);
                    }
                }
            }

            InputEvent::MouseMoved { x, y } => {
                self.pointer = (*x, *y);
            }

            InputEvent::MouseScroll { total } => {
                self.scroll_total = *total;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases arriving while unfocused are lost; avoid stuck keys.
                    self.keys.release_all();
                }
            }

            InputEvent::Resized { .. } => {}
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys.is_pressed(key)
    }
}
