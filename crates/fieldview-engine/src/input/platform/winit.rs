use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::Window;

use crate::input::{InputEvent, Key, KeyAction, KeyEvent, Modifiers};

/// Logical pixels per wheel "line" for high-precision (touchpad) scrolling.
const PIXELS_PER_LINE: f32 = 20.0;

/// Outcome of translating one winit event.
#[derive(Debug, Clone, PartialEq)]
pub enum Translated {
    Input(InputEvent),
    /// Close request that bypasses key dispatch (Escape release).
    Close,
    Ignored,
}

/// Stateful winit → engine translation.
///
/// winit 0.30 does not expose modifier or wheel queries, so both are tracked here.
#[derive(Debug, Default)]
pub struct InputTranslator {
    modifiers: Modifiers,
    wheel: WheelTotal,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates a winit `WindowEvent` into an engine event.
    pub fn translate(&mut self, window: &Window, event: &WindowEvent) -> Translated {
        match event {
            WindowEvent::ModifiersChanged(m) => {
                // winit 0.30: ModifiersChanged carries a wrapper with `.state()`.
                self.modifiers = map_modifiers(m.state());
                Translated::Ignored
            }

            WindowEvent::Focused(f) => Translated::Input(InputEvent::Focused(*f)),

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = to_logical_f32(window, *position);
                Translated::Input(InputEvent::MouseMoved { x, y })
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let action = match state {
                    ElementState::Pressed => KeyAction::Press,
                    ElementState::Released => KeyAction::Release,
                };

                Translated::Input(InputEvent::Key(KeyEvent {
                    key: map_mouse_button(*button),
                    scancode: 0,
                    action,
                    modifiers: self.modifiers,
                }))
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => {
                        let (_, y) = to_logical_f32(window, *p);
                        y / PIXELS_PER_LINE
                    }
                };
                let total = self.wheel.accumulate(lines);
                Translated::Input(InputEvent::MouseScroll { total })
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let (key, scancode) = map_physical_key(event.physical_key);
                let action = match (event.state, event.repeat) {
                    (ElementState::Pressed, false) => KeyAction::Press,
                    (ElementState::Pressed, true) => KeyAction::Repeat,
                    (ElementState::Released, _) => KeyAction::Release,
                };

                key_event(key, scancode, action, self.modifiers)
            }

            WindowEvent::CloseRequested => Translated::Close,

            _ => Translated::Ignored,
        }
    }
}

/// Builds the translation result for a keyboard event.
///
/// Escape release requests close directly and is never dispatched as a key.
pub(crate) fn key_event(key: Key, scancode: u32, action: KeyAction, modifiers: Modifiers) -> Translated {
    if key == Key::Escape && action == KeyAction::Release {
        return Translated::Close;
    }

    Translated::Input(InputEvent::Key(KeyEvent {
        key,
        scancode,
        action,
        modifiers,
    }))
}

/// Monotonic wheel accumulator. The total is never reset.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct WheelTotal {
    total: f32,
}

impl WheelTotal {
    pub(crate) fn accumulate(&mut self, lines: f32) -> f32 {
        self.total += lines;
        self.total
    }
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let scale = window.scale_factor();
    let logical = pos.to_logical::<f64>(scale);
    (logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

pub(crate) fn map_mouse_button(b: WinitMouseButton) -> Key {
    match b {
        WinitMouseButton::Left => Key::MouseLeft,
        WinitMouseButton::Right => Key::MouseRight,
        WinitMouseButton::Middle => Key::MouseMiddle,
        _ => Key::Unused,
    }
}

fn map_physical_key(pk: PhysicalKey) -> (Key, u32) {
    match pk {
        PhysicalKey::Code(code) => (map_key_code(code), code as u32),
        // winit 0.30 uses NativeKeyCode; no stable numeric is guaranteed here.
        PhysicalKey::Unidentified(_) => (Key::Unused, 0),
    }
}

pub(crate) fn map_key_code(code: KeyCode) -> Key {
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::F1 => Key::F1,
        KeyCode::F5 => Key::F5,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyC => Key::C,
        KeyCode::Space => Key::Space,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowUp => Key::ArrowUp,
        _ => Key::Unused,
    }
}
