//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The surface translates platform events into `InputEvent`s; the runtime
//! applies them to `InputState` and records edges into `InputFrame`.

mod frame;
pub mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::{InputState, KeyState, KeyTable};
pub use types::{InputEvent, Key, KeyAction, KeyEvent, Modifiers};
