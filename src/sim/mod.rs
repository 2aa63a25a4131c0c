//! Simulation Module
//!
//! Runs the single-vehicle circuit simulation: kinematics, chase
//! camera, and lap tracking, driven one fixed step at a time by the
//! session. Rendering and input devices live in the embedding layer.

pub mod camera;
pub mod input;
pub mod lap;
pub mod session;
pub mod vehicle;

pub use camera::{CameraState, ChaseCamera};
pub use input::{Control, InputState};
pub use lap::{LapEvent, LapTracker, RaceConfig};
pub use session::{RaceSession, RaceStatus};
pub use vehicle::{Vehicle, VehicleState};
