//! Vehicle - Player vehicle state and kinematics
//!
//! Integrates speed and heading from the control inputs each tick.
//! All constants are per-tick amounts; the session runs at a fixed
//! step so no delta-time scaling happens here.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::input::{Control, InputState};

/// Complete state for the player vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleState {
    /// World position
    pub position: Vec3,
    /// Yaw about the world up axis (radians, kept in [0, 2π))
    pub heading: f32,
    /// Signed longitudinal speed (world units per tick)
    pub speed: f32,
    /// Bounding box extents of the loaded model, consumed by the camera
    pub bounding_size: Vec3,
}

impl VehicleState {
    /// Create a vehicle at the placement of the loaded model.
    pub fn new(position: Vec3, heading: f32, bounding_size: Vec3) -> Self {
        Self {
            position,
            heading,
            speed: 0.0,
            bounding_size,
        }
    }
}

/// Vehicle kinematics logic
pub struct Vehicle;

impl Vehicle {
    /// Constants (per tick)
    pub const MAX_SPEED: f32 = 2.0;
    const ACCELERATION: f32 = 0.01;
    const BRAKE_DECELERATION: f32 = 0.02;
    const FRICTION: f32 = 0.01;
    const TURN_SPEED: f32 = 0.03;
    const STOP_EPSILON: f32 = 0.01;
    const LIFT_STEP: f32 = 0.3;
    pub const GROUND_LEVEL: f32 = 0.2;

    /// Advance the vehicle by one tick.
    pub fn update(state: &mut VehicleState, input: &InputState) {
        // Longitudinal: throttle, brake, or passive drag
        if input.is_pressed(Control::Forward) {
            state.speed += Self::ACCELERATION;
        } else if input.is_pressed(Control::Backward) {
            state.speed -= Self::BRAKE_DECELERATION;
        } else {
            state.speed *= 1.0 - Self::FRICTION;
        }

        // Reverse tops out at half of forward speed
        state.speed = state.speed.clamp(-Self::MAX_SPEED / 2.0, Self::MAX_SPEED);
        if state.speed.abs() < Self::STOP_EPSILON {
            state.speed = 0.0;
        }

        // Steering only bites while moving; the sign flip makes reverse
        // steering behave like a real car backing up
        if state.speed != 0.0 {
            let direction = if state.speed > 0.0 { 1.0 } else { -1.0 };
            let mut turned = false;
            if input.is_pressed(Control::TurnLeft) {
                state.heading += Self::TURN_SPEED * direction;
                turned = true;
            }
            if input.is_pressed(Control::TurnRight) {
                state.heading -= Self::TURN_SPEED * direction;
                turned = true;
            }
            if turned {
                state.heading = state.heading.rem_euclid(std::f32::consts::TAU);
            }
        }

        // Vertical lift, clamped at ground level
        if input.is_pressed(Control::Ascend) {
            state.position.y += Self::LIFT_STEP;
        }
        if input.is_pressed(Control::Descend) {
            state.position.y -= Self::LIFT_STEP;
            if state.position.y < Self::GROUND_LEVEL {
                state.position.y = Self::GROUND_LEVEL;
            }
        }

        // Heading-aligned planar translation
        state.position.x += state.heading.sin() * state.speed;
        state.position.z += state.heading.cos() * state.speed;
    }
}

/// Compact vehicle state for the render sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub position: Vec3,
    pub heading: f32,
    pub speed: f32,
}

impl From<&VehicleState> for VehicleSnapshot {
    fn from(state: &VehicleState) -> Self {
        Self {
            position: state.position,
            heading: state.heading,
            speed: state.speed,
        }
    }
}
