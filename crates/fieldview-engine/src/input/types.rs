use std::fmt;

/// Abstracted key identifier.
///
/// This is a closed set. The platform layer maps every key and mouse button it
/// does not recognize to `Key::Unused`, so nothing downstream ever indexes by a
/// raw platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Key {
    Escape,
    F1,
    F5,
    W,
    S,
    A,
    D,
    Space,
    C,

    MouseLeft,
    MouseRight,
    MouseMiddle,

    LeftShift,

    ArrowLeft,
    ArrowRight,
    ArrowDown,
    ArrowUp,

    /// Any platform key or button outside the set above.
    Unused,
}

impl Key {
    /// Every key, in help-table order.
    pub const ALL: [Key; 18] = [
        Key::Escape,
        Key::F1,
        Key::A,
        Key::W,
        Key::S,
        Key::D,
        Key::MouseLeft,
        Key::MouseRight,
        Key::MouseMiddle,
        Key::LeftShift,
        Key::C,
        Key::Space,
        Key::F5,
        Key::ArrowLeft,
        Key::ArrowUp,
        Key::ArrowDown,
        Key::ArrowRight,
        Key::Unused,
    ];

    /// Short display name, `None` for `Unused`.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Key::Escape => "ESC",
            Key::F1 => "F1",
            Key::F5 => "F5",
            Key::W => "W",
            Key::S => "S",
            Key::A => "A",
            Key::D => "D",
            Key::Space => "SPACE",
            Key::C => "C",
            Key::MouseLeft => "MB_LEFT",
            Key::MouseRight => "MB_RIGHT",
            Key::MouseMiddle => "MB_MID",
            Key::LeftShift => "LSHIFT",
            Key::ArrowLeft => "LEFT",
            Key::ArrowRight => "RIGHT",
            Key::ArrowDown => "DOWN",
            Key::ArrowUp => "UP",
            Key::Unused => return None,
        };
        Some(name)
    }

    /// What the key does in the viewer, if anything.
    pub fn description(self) -> Option<&'static str> {
        match self {
            Key::Escape => Some("exit"),
            Key::F1 => Some("reload shaders"),
            Key::F5 => Some("cycle debug mode"),
            Key::W => Some("move forward"),
            Key::S => Some("move backwards"),
            Key::A => Some("strafe left"),
            Key::D => Some("strafe right"),
            Key::Space => Some("move up"),
            Key::C => Some("move down"),
            Key::MouseLeft => Some("rotate camera"),
            Key::MouseMiddle => Some("pan camera"),
            Key::LeftShift => Some("reset target while panning"),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => f.write_str("UNUSED"),
        }
    }
}

/// Transition carried by a key or button event.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyAction {
    Press,
    Release,
    /// Auto-repeat while held. Never produces a new press edge.
    Repeat,
}

/// Modifier keys state.
///
/// This is stored as booleans rather than bitflags to keep it explicit and stable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Normalized key (or mouse button) event.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeyEvent {
    pub key: Key,
    /// Raw platform code, `0` for mouse buttons.
    pub scancode: u32,
    pub action: KeyAction,
    pub modifiers: Modifiers,
}

/// Platform-agnostic input events emitted by a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(KeyEvent),

    /// Cursor position in logical pixels.
    MouseMoved { x: f32, y: f32 },

    /// Running wheel total since the surface was created. Consumers diff
    /// consecutive totals themselves.
    MouseScroll { total: f32 },

    /// Drawable size changed, in physical pixels.
    Resized { width: u32, height: u32 },

    /// Window focus change.
    Focused(bool),
}
