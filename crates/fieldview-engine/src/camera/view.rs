use glam::{Quat, Vec3};

/// World up axis. Movement up/down and the yaw rotation use it.
pub const WORLD_UP: Vec3 = Vec3::Y;

pub const DEFAULT_POSITION: Vec3 = Vec3::new(5.0, 15.0, 5.0);
pub const DEFAULT_LOOK_AT: Vec3 = Vec3::ZERO;

/// Axes the yaw/pitch rotation starts from.
pub const DEFAULT_DIRECTION: Vec3 = Vec3::new(0.0, 0.0, 1.0);
pub const DEFAULT_RIGHT: Vec3 = Vec3::new(-1.0, 0.0, 0.0);

/// Largest accepted |pitch|, in degrees.
pub const PITCH_LIMIT: f32 = 89.0;

/// Euler angles in degrees. Roll is carried but never applied.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Angles {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Default for Angles {
    fn default() -> Self {
        Self {
            pitch: -35.0,
            yaw: 45.0,
            roll: 0.0,
        }
    }
}

/// Orthonormal camera axes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Basis {
    pub direction: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Basis {
    /// Rotates the default axes by `yaw` around world up, then the direction by
    /// `pitch` around the yawed right axis, and re-derives right/up by cross
    /// products so the result is orthonormal.
    pub fn from_angles(angles: Angles) -> Self {
        let yaw = Quat::from_axis_angle(WORLD_UP, angles.yaw.to_radians());
        let direction = (yaw * DEFAULT_DIRECTION).normalize();
        let right = (yaw * DEFAULT_RIGHT).normalize();

        let pitch = Quat::from_axis_angle(right, angles.pitch.to_radians());
        let direction = pitch * direction;

        Self::orthonormalize(direction)
    }

    /// Builds right/up from `direction` against world up.
    ///
    /// `direction` must not be parallel to world up; the pitch limit guarantees that.
    pub fn orthonormalize(direction: Vec3) -> Self {
        let direction = direction.normalize();
        let right = direction.cross(WORLD_UP).normalize();
        let up = right.cross(direction).normalize();

        Self {
            direction,
            right,
            up,
        }
    }
}

/// Camera pose.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewState {
    pub position: Vec3,
    pub look_at: Vec3,
    pub direction: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub angles: Angles,
}

impl ViewState {
    /// Pose at `position` oriented by `angles`, looking one unit ahead.
    pub fn from_pose(position: Vec3, angles: Angles) -> Self {
        let basis = Basis::from_angles(angles);

        Self {
            position,
            look_at: position + basis.direction,
            direction: basis.direction,
            right: basis.right,
            up: basis.up,
            angles,
        }
    }

    pub fn basis(&self) -> Basis {
        Basis {
            direction: self.direction,
            right: self.right,
            up: self.up,
        }
    }
}

impl Default for ViewState {
    /// Default position and angles.
    ///
    /// The basis comes from the angles rather than from `DEFAULT_LOOK_AT`, so a
    /// zero-input update leaves the default pose unchanged.
    fn default() -> Self {
        let mut view = Self::from_pose(DEFAULT_POSITION, Angles::default());
        view.look_at = DEFAULT_LOOK_AT;
        view
    }
}

/// Wraps `yaw` into `(-180, 180]`. Values already in range are returned unchanged.
pub fn wrap_yaw(yaw: f32) -> f32 {
    if yaw > -180.0 && yaw <= 180.0 {
        return yaw;
    }

    let wrapped = (yaw + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 { wrapped + 360.0 } else { wrapped }
}
