//! Circuit Racer - Simulation Core
//!
//! Headless driving simulation: one controllable vehicle on a circular
//! track, a chase camera, and a lap counter that ends the race after a
//! fixed number of finish-line crossings.
//!
//! The embedding layer (renderer, input devices, HUD) owns everything
//! visual. It feeds press/release events in via [`RaceSession::set_control`],
//! drives [`RaceSession::tick`] from a fixed-rate clock, and reads the
//! resulting [`SessionSnapshot`] and [`DisplayState`] each frame.
//!
//! ```
//! use circuit_racer::{Control, RaceConfig, RaceSession};
//! use glam::Vec3;
//!
//! let mut session = RaceSession::new(RaceConfig::default());
//! session.spawn_vehicle(Vec3::new(10.0, 0.2, 0.5), 0.0, Vec3::new(0.0, 4.0, 5.0));
//! session.start_race();
//! session.set_control(Control::Forward, true);
//! let snapshot = session.tick();
//! assert!(snapshot.vehicle.is_some());
//! ```

pub mod sim;

pub use sim::camera::{CameraSnapshot, CameraState, ChaseCamera};
pub use sim::input::{Control, InputState};
pub use sim::lap::{LapEvent, LapTracker, RaceConfig};
pub use sim::session::{
    create_shared_session, DisplayState, RaceSession, RaceStatus, SessionSnapshot, SessionStats,
    SharedSession, TICK_RATE,
};
pub use sim::vehicle::{Vehicle, VehicleSnapshot, VehicleState};
