//! Map space is right-handed with Z up. A Z-up scene takes positions and
//! rotations unchanged (modulo scale); a Y-up scene needs the y/z components
//! swapped and rotations conjugated by a 90° change of basis about X.

use crate::settings::AxisUp;
use glam::{DQuat, DVec3, EulerRot};
use std::f64::consts::FRAC_PI_2;

#[inline]
pub fn map_to_scene_position(position: DVec3, scale_factor: f64, axis_up: AxisUp) -> DVec3 {
    let scaled = position * scale_factor;
    match axis_up {
        AxisUp::Z => scaled,
        AxisUp::Y => DVec3::new(scaled.x, scaled.z, scaled.y),
    }
}

#[inline]
pub fn scene_to_map_position(position: DVec3, scale_factor: f64, axis_up: AxisUp) -> DVec3 {
    let scaled = position * scale_factor;
    match axis_up {
        AxisUp::Z => scaled,
        AxisUp::Y => DVec3::new(scaled.x, scaled.z, scaled.y),
    }
}

/// XYZ Euler angles for a placement rotated by `rotation_z` radians about the
/// map's vertical axis.
#[inline]
pub fn map_to_scene_rotation(rotation_z: f64, axis_up: AxisUp) -> DVec3 {
    match axis_up {
        AxisUp::Z => DVec3::new(0.0, 0.0, rotation_z),
        AxisUp::Y => {
            let basis = DQuat::from_rotation_x(FRAC_PI_2);
            let rebased = basis * DQuat::from_rotation_z(rotation_z) * basis.inverse();
            let (x, y, z) = rebased.to_euler(EulerRot::XYZ);
            DVec3::new(x, y, z)
        }
    }
}

/// Recovers the scalar vertical-axis angle (radians) from an instance's Euler
/// rotation. Exact inverse of [`map_to_scene_rotation`].
#[inline]
pub fn scene_to_map_rotation(rotation_euler: DVec3, axis_up: AxisUp) -> f64 {
    match axis_up {
        AxisUp::Z => rotation_euler.z,
        AxisUp::Y => {
            let basis = DQuat::from_rotation_x(FRAC_PI_2);
            let rotation = DQuat::from_euler(
                EulerRot::XYZ,
                rotation_euler.x,
                rotation_euler.y,
                rotation_euler.z,
            );
            let (_, _, z) = (basis.inverse() * rotation * basis).to_euler(EulerRot::XYZ);
            z
        }
    }
}
