use glam::Vec3;

use crate::input::{InputFrame, InputState, Key};

use super::frame_state::{FrameDeltas, FrameStates};
use super::view::{wrap_yaw, Basis, DEFAULT_LOOK_AT, PITCH_LIMIT, WORLD_UP};

/// Number of debug levels cycled by `Key::F5`.
pub const DEBUG_MODES: u8 = 4;

/// Camera sensitivities.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraSettings {
    /// Units per second for keyboard movement.
    pub move_speed: f32,
    /// Middle-button pan, per pixel per second.
    pub pan_sensitivity: f32,
    /// Degrees per pixel while the left button is held.
    pub rotate_sensitivity: f32,
    /// Wheel dolly multiplier on top of `move_speed`.
    pub zoom_multiplier: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            pan_sensitivity: 0.5,
            rotate_sensitivity: 0.1,
            zoom_multiplier: 8.0,
        }
    }
}

/// Side effects requested by one controller update.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraActions {
    /// `Key::F1` went down this frame.
    pub reload_shaders: bool,
    /// Debug level after this frame, `0..DEBUG_MODES`.
    pub debug_mode: u8,
    pub deltas: FrameDeltas,
}

/// Integrates held keys and mouse motion into the camera pose.
#[derive(Debug, Clone, Default)]
pub struct CameraController {
    pub settings: CameraSettings,
    debug_mode: u8,
}

impl CameraController {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            debug_mode: 0,
        }
    }

    pub fn debug_mode(&self) -> u8 {
        self.debug_mode
    }

    /// Runs one frame of camera integration and snapshots `frames`.
    ///
    /// `input` supplies held state, `edges` the keys that went down since the
    /// previous update. `size` is the current drawable size.
    pub fn update(
        &mut self,
        frames: &mut FrameStates,
        input: &InputState,
        edges: &InputFrame,
        size: (u32, u32),
    ) -> CameraActions {
        let s = self.settings;
        let deltas = frames.deltas();
        let FrameDeltas { dt, wheel, dx, dy } = deltas;

        let mut yaw = 0.0;
        let mut pitch = 0.0;
        if input.key_down(Key::MouseLeft) {
            yaw = -dx * s.rotate_sensitivity;
            pitch = -dy * s.rotate_sensitivity;
        }

        let reload_shaders = edges.pressed(Key::F1);

        if edges.pressed(Key::F5) {
            self.debug_mode = (self.debug_mode + 1) % DEBUG_MODES;
        }

        let view = &mut frames.current.view;
        let direction = view.direction;
        let right = view.right;
        let up = WORLD_UP;

        let mut offset = Vec3::ZERO;

        if input.key_down(Key::MouseMiddle) {
            offset += up * (dy * s.pan_sensitivity * dt);
            offset -= right * (dx * s.pan_sensitivity * dt);

            if input.key_down(Key::LeftShift) {
                view.look_at = DEFAULT_LOOK_AT;
            }
        }

        let step = s.move_speed * dt;
        let moves = [
            (Key::W, direction),
            (Key::S, -direction),
            (Key::A, -right),
            (Key::D, right),
            (Key::C, -up),
            (Key::Space, up),
        ];
        for (key, axis) in moves {
            if input.key_down(key) {
                offset += axis * step;
            }
        }

        if wheel != 0.0 {
            offset += direction * (wheel * s.move_speed * s.zoom_multiplier * dt);
        }

        view.position += offset;

        // A pitch step that would leave the limit is dropped, not clamped.
        if (view.angles.pitch + pitch).abs() <= PITCH_LIMIT {
            view.angles.pitch += pitch;
        }
        view.angles.yaw = wrap_yaw(view.angles.yaw + yaw);

        // Rebuilt from the angles every frame, re-orthogonalized against world up.
        let basis = Basis::from_angles(view.angles);
        view.look_at = view.position + basis.direction;
        view.direction = basis.direction;
        view.right = basis.right;
        view.up = basis.up;

        frames.current.width = size.0;
        frames.current.height = size.1;

        frames.snapshot();

        CameraActions {
            reload_shaders,
            debug_mode: self.debug_mode,
            deltas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Angles, ViewState, DEFAULT_POSITION};
    use crate::input::{InputEvent, KeyAction, KeyEvent, Modifiers};

    const EPS: f32 = 1e-5;
    const SIZE: (u32, u32) = (800, 600);

    struct Rig {
        frames: FrameStates,
        input: InputState,
        edges: InputFrame,
        camera: CameraController,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                frames: FrameStates::new(),
                input: InputState::default(),
                edges: InputFrame::default(),
                camera: CameraController::default(),
            }
        }

        fn key(&mut self, key: Key, action: KeyAction) {
            let ev = InputEvent::Key(KeyEvent {
                key,
                scancode: 0,
                action,
                modifiers: Modifiers::default(),
            });
            self.input.apply_event(&mut self.edges, &ev);
        }

        /// One frame: advance time, run the controller, drop this frame's edges.
        fn frame(&mut self, dt: f32) -> CameraActions {
            self.frames.current.time += dt;
            let actions = self
                .camera
                .update(&mut self.frames, &self.input, &self.edges, SIZE);
            self.edges.clear();
            actions
        }

        fn view(&self) -> ViewState {
            self.frames.current.view
        }
    }

    fn assert_orthonormal(v: &ViewState) {
        let b = v.basis();
        assert!((b.direction.length() - 1.0).abs() < EPS, "{b:?}");
        assert!((b.right.length() - 1.0).abs() < EPS, "{b:?}");
        assert!((b.up.length() - 1.0).abs() < EPS, "{b:?}");
        assert!(b.direction.dot(b.right).abs() < EPS, "{b:?}");
        assert!(b.direction.dot(b.up).abs() < EPS, "{b:?}");
        assert!(b.right.dot(b.up).abs() < EPS, "{b:?}");
    }

    /// Deterministic pseudo-random sequence in `[-1, 1)`.
    struct Lcg(u32);

    impl Lcg {
        fn next(&mut self) -> f32 {
            self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (self.0 >> 8) as f32 / (1u32 << 23) as f32 - 1.0
        }
    }

    // ── defaults / idempotence ────────────────────────────────────────────

    #[test]
    fn zero_input_update_keeps_default_pose() {
        let mut rig = Rig::new();
        let before = rig.view();

        rig.frame(0.0);
        let after = rig.view();

        assert_eq!(after.position, DEFAULT_POSITION);
        assert_eq!(after.angles, Angles::default());
        assert_eq!(after.direction, before.direction);
        assert_eq!(after.right, before.right);
        assert_eq!(after.up, before.up);
    }

    #[test]
    fn zero_input_update_is_idempotent_after_motion() {
        let mut rig = Rig::new();
        rig.key(Key::MouseLeft, KeyAction::Press);
        rig.frames.current.mouse.x = 37.0;
        rig.frames.current.mouse.y = -12.0;
        rig.key(Key::D, KeyAction::Press);
        rig.frame(0.5);
        rig.key(Key::D, KeyAction::Release);
        rig.key(Key::MouseLeft, KeyAction::Release);
        rig.frame(0.0);

        let before = rig.view();
        rig.frame(0.0);
        let after = rig.view();

        assert_eq!(after.position, before.position);
        assert_eq!(after.angles, before.angles);
        assert_eq!(after.basis(), before.basis());
    }

    // ── movement ──────────────────────────────────────────────────────────

    #[test]
    fn forward_for_one_second_moves_move_speed_along_direction() {
        let mut rig = Rig::new();
        let start = rig.view();

        rig.key(Key::W, KeyAction::Press);
        rig.frame(1.0);

        let expected = start.position + start.direction * 5.0;
        assert!(rig.view().position.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut rig = Rig::new();
        rig.key(Key::A, KeyAction::Press);
        rig.key(Key::D, KeyAction::Press);
        rig.key(Key::C, KeyAction::Press);
        rig.key(Key::Space, KeyAction::Press);
        rig.frame(1.0);

        assert!(rig.view().position.abs_diff_eq(DEFAULT_POSITION, EPS));
    }

    #[test]
    fn space_moves_along_world_up() {
        let mut rig = Rig::new();
        rig.key(Key::Space, KeyAction::Press);
        rig.frame(0.5);

        let expected = DEFAULT_POSITION + WORLD_UP * 2.5;
        assert!(rig.view().position.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn wheel_dollies_along_direction() {
        let mut rig = Rig::new();
        let start = rig.view();

        rig.frames.current.mouse.scroll_y = 1.0;
        let actions = rig.frame(0.25);

        assert_eq!(actions.deltas.wheel, 1.0);
        let expected = start.position + start.direction * (1.0 * 5.0 * 8.0 * 0.25);
        assert!(rig.view().position.abs_diff_eq(expected, 1e-4));

        // Same total next frame: no further dolly.
        let before = rig.view().position;
        let actions = rig.frame(0.25);
        assert_eq!(actions.deltas.wheel, 0.0);
        assert_eq!(rig.view().position, before);
    }

    #[test]
    fn middle_drag_pans_and_shift_has_no_lasting_target() {
        let mut rig = Rig::new();
        let start = rig.view();

        rig.key(Key::MouseMiddle, KeyAction::Press);
        rig.key(Key::LeftShift, KeyAction::Press);
        rig.frames.current.mouse.x = 10.0;
        rig.frames.current.mouse.y = 4.0;
        rig.frame(1.0);

        let expected = start.position + WORLD_UP * (4.0 * 0.5) - start.right * (10.0 * 0.5);
        let view = rig.view();
        assert!(view.position.abs_diff_eq(expected, 1e-4));
        // Target is always re-derived from the pose at the end of the frame.
        assert!(view.look_at.abs_diff_eq(view.position + view.direction, EPS));
        assert_eq!(view.angles, start.angles);
    }

    // ── rotation ──────────────────────────────────────────────────────────

    #[test]
    fn left_drag_rotates_by_sensitivity() {
        let mut rig = Rig::new();
        rig.key(Key::MouseLeft, KeyAction::Press);
        rig.frames.current.mouse.x = 50.0;
        rig.frames.current.mouse.y = -100.0;
        rig.frame(0.016);

        let angles = rig.view().angles;
        assert!((angles.yaw - (45.0 - 5.0)).abs() < EPS);
        assert!((angles.pitch - (-35.0 + 10.0)).abs() < EPS);
    }

    #[test]
    fn mouse_motion_without_button_does_not_rotate() {
        let mut rig = Rig::new();
        rig.frames.current.mouse.x = 500.0;
        rig.frames.current.mouse.y = 500.0;
        rig.frame(0.016);

        assert_eq!(rig.view().angles, Angles::default());
    }

    #[test]
    fn pitch_step_past_limit_is_rejected_entirely() {
        let mut rig = Rig::new();
        rig.key(Key::MouseLeft, KeyAction::Press);

        // -35 - 60 = -95: rejected, pitch stays where it was.
        rig.frames.current.mouse.y = 600.0;
        rig.frame(0.016);
        assert_eq!(rig.view().angles.pitch, -35.0);

        // -35 - 50 = -85: accepted.
        rig.frames.current.mouse.y += 500.0;
        rig.frame(0.016);
        assert!((rig.view().angles.pitch + 85.0).abs() < 1e-4);
    }

    #[test]
    fn pitch_never_leaves_limit_and_yaw_stays_wrapped() {
        let mut rig = Rig::new();
        let mut rng = Lcg(7);
        rig.key(Key::MouseLeft, KeyAction::Press);

        for _ in 0..2000 {
            rig.frames.current.mouse.x += rng.next() * 4000.0;
            rig.frames.current.mouse.y += rng.next() * 400.0;
            rig.frame(0.016);

            let v = rig.view();
            assert!(v.angles.pitch.abs() <= PITCH_LIMIT, "pitch {}", v.angles.pitch);
            assert!(
                v.angles.yaw > -180.0 && v.angles.yaw <= 180.0,
                "yaw {}",
                v.angles.yaw
            );
        }
    }

    #[test]
    fn basis_stays_orthonormal_under_arbitrary_input() {
        let mut rig = Rig::new();
        let mut rng = Lcg(42);
        let keys = [
            Key::W,
            Key::S,
            Key::A,
            Key::D,
            Key::C,
            Key::Space,
            Key::MouseLeft,
            Key::MouseMiddle,
            Key::LeftShift,
        ];

        for i in 0..1000 {
            let key = keys[i % keys.len()];
            let action = if rng.next() > 0.0 {
                KeyAction::Press
            } else {
                KeyAction::Release
            };
            rig.key(key, action);

            rig.frames.current.mouse.x += rng.next() * 300.0;
            rig.frames.current.mouse.y += rng.next() * 300.0;
            rig.frames.current.mouse.scroll_y += rng.next().round();
            rig.frame((rng.next() + 1.0) * 0.05);

            assert_orthonormal(&rig.view());
        }
    }

    // ── edge-triggered actions ────────────────────────────────────────────

    #[test]
    fn reload_fires_once_per_press_while_held() {
        let mut rig = Rig::new();
        rig.key(Key::F1, KeyAction::Press);

        let fired: Vec<bool> = (0..5)
            .map(|_| {
                let a = rig.frame(0.016);
                rig.key(Key::F1, KeyAction::Repeat);
                a.reload_shaders
            })
            .collect();
        assert_eq!(fired, [true, false, false, false, false]);

        rig.key(Key::F1, KeyAction::Release);
        rig.key(Key::F1, KeyAction::Press);
        assert!(rig.frame(0.016).reload_shaders);
    }

    #[test]
    fn debug_mode_cycles_modulo_four() {
        let mut rig = Rig::new();
        let mut modes = Vec::new();

        for _ in 0..5 {
            rig.key(Key::F5, KeyAction::Press);
            modes.push(rig.frame(0.016).debug_mode);
            // Held for another frame: no advance.
            modes.push(rig.frame(0.016).debug_mode);
            rig.key(Key::F5, KeyAction::Release);
        }

        assert_eq!(modes, [1, 1, 2, 2, 3, 3, 0, 0, 1, 1]);
    }

    // ── bookkeeping ───────────────────────────────────────────────────────

    #[test]
    fn update_refreshes_size_and_snapshots() {
        let mut rig = Rig::new();
        rig.frames.current.mouse.x = 3.0;
        rig.frame(0.5);

        assert_eq!(rig.frames.current.width, 800);
        assert_eq!(rig.frames.current.height, 600);
        assert_eq!(rig.frames.previous, rig.frames.current);
    }
}
