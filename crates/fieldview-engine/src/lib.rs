//! Fieldview engine crate.
//!
//! Platform and GPU runtime for a single fullscreen shader viewer: the frame
//! loop and input dispatch, the camera controller, and the hot-reloadable
//! shader program with the uniforms it reads.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod camera;
pub mod shader;
pub mod render;
