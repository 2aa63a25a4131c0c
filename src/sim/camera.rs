//! Camera - Chase camera tracking
//!
//! Follows the vehicle from a trailing offset that rotates with its
//! heading. Both the position and the look direction are lerped, so the
//! camera lags the car slightly instead of tracking it rigidly.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::sim::vehicle::VehicleState;

/// Camera transform exposed to the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Vec3,
    /// Direction the camera looks along, not normalized
    pub look_direction: Vec3,
}

impl CameraState {
    /// Snap directly behind the vehicle. Used once at spawn; every later
    /// update only interpolates.
    pub fn behind(vehicle: &VehicleState) -> Self {
        let position = vehicle.position + ChaseCamera::trailing_offset(vehicle);
        let look_direction = ChaseCamera::look_target(vehicle) - position;
        Self {
            position,
            look_direction,
        }
    }
}

/// Chase camera tracking logic
pub struct ChaseCamera;

impl ChaseCamera {
    /// Constants
    const FOLLOW_FACTOR: f32 = 0.1;
    const LOOK_FACTOR: f32 = 0.2;
    const HEIGHT_SCALE: f32 = 3.0;
    const DISTANCE_SCALE: f32 = 1.2;
    const LOOK_HEIGHT_SCALE: f32 = 1.2;

    /// Offset from the vehicle to the desired camera position, rotated
    /// about the world up axis so the camera stays behind the car.
    fn trailing_offset(vehicle: &VehicleState) -> Vec3 {
        let size = vehicle.bounding_size;
        let offset = Vec3::new(
            0.0,
            size.y * Self::HEIGHT_SCALE,
            -size.z * Self::DISTANCE_SCALE,
        );
        Quat::from_rotation_y(vehicle.heading) * offset
    }

    /// Point above the vehicle the camera aims at.
    fn look_target(vehicle: &VehicleState) -> Vec3 {
        vehicle.position + Vec3::Y * (vehicle.bounding_size.y * Self::LOOK_HEIGHT_SCALE)
    }

    /// Advance the camera one tick toward the vehicle.
    pub fn update(camera: &mut CameraState, vehicle: &VehicleState) {
        let target_position = vehicle.position + Self::trailing_offset(vehicle);
        camera.position = camera.position.lerp(target_position, Self::FOLLOW_FACTOR);

        // The look direction is itself lerped, so the aim trails the
        // already-lagged position for a soft tracking feel
        let to_target = Self::look_target(vehicle) - camera.position;
        camera.look_direction = camera.look_direction.lerp(to_target, Self::LOOK_FACTOR);
    }
}

/// Compact camera state for the render sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub look_direction: Vec3,
}

impl From<&CameraState> for CameraSnapshot {
    fn from(state: &CameraState) -> Self {
        Self {
            position: state.position,
            look_direction: state.look_direction,
        }
    }
}
