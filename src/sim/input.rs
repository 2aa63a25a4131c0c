//! Input - Abstract control signals
//!
//! The core never sees keyboards or touch buttons; the embedding layer
//! translates whatever devices it has into press/release events on a
//! fixed set of named controls.

use serde::{Deserialize, Serialize};

/// The six controls the simulation understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    Ascend,
    Descend,
}

/// Pressed/released status of every control.
///
/// Mutated by discrete input events, read once per tick by the session.
/// Sharing across threads goes through `SharedSession`; within one event
/// loop plain reads and writes are enough.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    forward: bool,
    backward: bool,
    turn_left: bool,
    turn_right: bool,
    ascend: bool,
    descend: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press or release event for one control.
    pub fn set(&mut self, control: Control, pressed: bool) {
        match control {
            Control::Forward => self.forward = pressed,
            Control::Backward => self.backward = pressed,
            Control::TurnLeft => self.turn_left = pressed,
            Control::TurnRight => self.turn_right = pressed,
            Control::Ascend => self.ascend = pressed,
            Control::Descend => self.descend = pressed,
        }
    }

    pub fn is_pressed(&self, control: Control) -> bool {
        match control {
            Control::Forward => self.forward,
            Control::Backward => self.backward,
            Control::TurnLeft => self.turn_left,
            Control::TurnRight => self.turn_right,
            Control::Ascend => self.ascend,
            Control::Descend => self.descend,
        }
    }

    /// Release everything, e.g. when the embedding window loses focus.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
