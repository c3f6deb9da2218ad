//! First-person camera.
//!
//! `FrameStates` holds the current and previous frame readings, and
//! `CameraController::update` turns their difference plus held keys into a new
//! `ViewState`, then snapshots current into previous.

mod controller;
mod frame_state;
mod view;

pub use controller::{CameraActions, CameraController, CameraSettings, DEBUG_MODES};
pub use frame_state::{FrameDeltas, FrameState, FrameStates, MouseState};
pub use view::{
    wrap_yaw, Angles, Basis, ViewState, DEFAULT_DIRECTION, DEFAULT_LOOK_AT, DEFAULT_POSITION,
    DEFAULT_RIGHT, PITCH_LIMIT, WORLD_UP,
};
