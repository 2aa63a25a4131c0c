//! Session - Race session and per-frame driver
//!
//! Owns all simulation state and advances it in fixed order once per
//! tick: countdown, vehicle kinematics, chase camera, lap detection.
//! Provides snapshots for the renderer, a display record for the HUD,
//! and the interface for embedding layers.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::camera::{CameraSnapshot, CameraState, ChaseCamera};
use crate::sim::input::{Control, InputState};
use crate::sim::lap::{LapEvent, LapTracker, RaceConfig};
use crate::sim::vehicle::{Vehicle, VehicleSnapshot, VehicleState};

/// Nominal tick rate the per-tick constants are tuned for.
///
/// `tick()` always advances exactly one step; embedders drive it from a
/// fixed-rate clock rather than the render loop.
pub const TICK_RATE: f32 = 60.0;

/// Ticks per countdown step (0.5 s at the nominal rate)
const COUNTDOWN_STEP_TICKS: u32 = 30;
/// Countdown values shown before "GO!"
const COUNTDOWN_STEPS: u32 = 3;

/// Race lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceStatus {
    NotStarted,
    Countdown,
    Racing,
    Finished,
}

/// HUD-facing display record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayState {
    pub speed_display: u32,
    pub laps_completed: u32,
    pub total_laps: u32,
    pub status_message: String,
}

/// Session statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub tick_rate: f32,
    pub avg_tick_time_ms: f32,
    pub status: RaceStatus,
}

/// Full per-frame snapshot for the render sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: RaceStatus,
    pub vehicle: Option<VehicleSnapshot>,
    pub camera: Option<CameraSnapshot>,
    pub laps_completed: u32,
    pub total_laps: u32,
}

/// Complete race session
pub struct RaceSession {
    /// Current lifecycle state
    status: RaceStatus,
    /// Control inputs, written by the embedder's input events
    input: InputState,
    /// Vehicle, absent until the model finishes loading
    vehicle: Option<VehicleState>,
    /// Chase camera, created alongside the vehicle
    camera: Option<CameraState>,
    /// Finish-line crossing detector
    lap_tracker: LapTracker,
    /// Ticks left in the countdown
    countdown_ticks: u32,
    /// Ticks the "GO!" message stays up after the race starts
    go_ticks: u32,
    /// Whether ticks advance (pause flag)
    running: bool,
    /// Accumulated tick times for averaging
    tick_times: Vec<f32>,
}

impl RaceSession {
    /// Create a session. The vehicle is spawned separately once the
    /// embedder's asset load completes.
    pub fn new(config: RaceConfig) -> Self {
        Self {
            status: RaceStatus::NotStarted,
            input: InputState::new(),
            vehicle: None,
            camera: None,
            lap_tracker: LapTracker::new(config),
            countdown_ticks: 0,
            go_ticks: 0,
            running: true,
            tick_times: Vec::with_capacity(60),
        }
    }

    /// Install the vehicle at its loaded placement and snap the camera
    /// behind it.
    pub fn spawn_vehicle(&mut self, position: Vec3, heading: f32, bounding_size: Vec3) {
        let vehicle = VehicleState::new(position, heading, bounding_size);
        self.camera = Some(CameraState::behind(&vehicle));
        self.vehicle = Some(vehicle);
        log::info!("Vehicle spawned at {position}");
    }

    /// Record a press/release event for one control.
    pub fn set_control(&mut self, control: Control, pressed: bool) {
        self.input.set(control, pressed);
    }

    /// Begin the start countdown. The race goes active when the
    /// countdown elapses.
    pub fn start_race(&mut self) {
        if self.status != RaceStatus::NotStarted {
            return;
        }
        self.status = RaceStatus::Countdown;
        self.countdown_ticks = COUNTDOWN_STEPS * COUNTDOWN_STEP_TICKS;
        log::info!("Race countdown started");
    }

    /// Advance the session by one fixed step.
    pub fn tick(&mut self) -> SessionSnapshot {
        if !self.running {
            return self.snapshot();
        }

        let tick_start = Instant::now();

        self.advance_countdown();

        // Everything below needs the vehicle; skip while the model is
        // still loading
        if let Some(vehicle) = &mut self.vehicle {
            if self.status == RaceStatus::Racing {
                Vehicle::update(vehicle, &self.input);
            }

            if let Some(camera) = &mut self.camera {
                ChaseCamera::update(camera, vehicle);
            }

            if self.status == RaceStatus::Racing {
                match self.lap_tracker.check(vehicle.position) {
                    Some(LapEvent::LapCompleted(lap)) => {
                        log::info!(
                            "Lap {lap}/{} completed",
                            self.lap_tracker.config.total_laps
                        );
                    }
                    Some(LapEvent::RaceFinished) => {
                        vehicle.speed = 0.0;
                        self.status = RaceStatus::Finished;
                        log::info!("Race finished after {} laps", self.lap_tracker.laps_completed());
                    }
                    None => {}
                }
            }
        }

        let tick_time = tick_start.elapsed().as_secs_f32() * 1000.0;
        self.tick_times.push(tick_time);
        if self.tick_times.len() > 60 {
            self.tick_times.remove(0);
        }

        self.snapshot()
    }

    fn advance_countdown(&mut self) {
        match self.status {
            RaceStatus::Countdown => {
                self.countdown_ticks -= 1;
                if self.countdown_ticks == 0 {
                    self.status = RaceStatus::Racing;
                    self.go_ticks = COUNTDOWN_STEP_TICKS;
                    log::info!("GO! Race is active");
                }
            }
            RaceStatus::Racing => {
                self.go_ticks = self.go_ticks.saturating_sub(1);
            }
            _ => {}
        }
    }

    /// Current render-sink snapshot without advancing the simulation.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            vehicle: self.vehicle.as_ref().map(VehicleSnapshot::from),
            camera: self.camera.as_ref().map(CameraSnapshot::from),
            laps_completed: self.lap_tracker.laps_completed(),
            total_laps: self.lap_tracker.config.total_laps,
        }
    }

    /// Current HUD record.
    pub fn display(&self) -> DisplayState {
        let speed = self.vehicle.as_ref().map(|v| v.speed).unwrap_or(0.0);
        DisplayState {
            speed_display: (speed.abs() * 100.0).round() as u32,
            laps_completed: self.lap_tracker.laps_completed(),
            total_laps: self.lap_tracker.config.total_laps,
            status_message: self.status_message(),
        }
    }

    fn status_message(&self) -> String {
        match self.status {
            RaceStatus::NotStarted => String::new(),
            RaceStatus::Countdown => {
                // 3, 2, 1 at half-second steps
                let value = (self.countdown_ticks + COUNTDOWN_STEP_TICKS - 1) / COUNTDOWN_STEP_TICKS;
                value.to_string()
            }
            RaceStatus::Racing => {
                if self.go_ticks > 0 {
                    "GO!".to_string()
                } else {
                    String::new()
                }
            }
            RaceStatus::Finished => "FINISH!".to_string(),
        }
    }

    /// Session statistics.
    pub fn stats(&self) -> SessionStats {
        let avg_tick_time = if self.tick_times.is_empty() {
            0.0
        } else {
            self.tick_times.iter().sum::<f32>() / self.tick_times.len() as f32
        };

        SessionStats {
            tick_rate: TICK_RATE,
            avg_tick_time_ms: avg_tick_time,
            status: self.status,
        }
    }

    pub fn status(&self) -> RaceStatus {
        self.status
    }

    /// Pause the simulation.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Resume after a pause.
    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Check if the session is advancing.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Back to a fresh, not-yet-started session. The vehicle is dropped;
    /// the embedder re-spawns it when ready.
    pub fn reset(&mut self) {
        self.status = RaceStatus::NotStarted;
        self.vehicle = None;
        self.camera = None;
        self.input.clear();
        self.lap_tracker.reset();
        self.countdown_ticks = 0;
        self.go_ticks = 0;
        self.running = true;
        self.tick_times.clear();
    }
}

impl Default for RaceSession {
    fn default() -> Self {
        Self::new(RaceConfig::default())
    }
}

/// Thread-safe session wrapper for embedding layers
pub type SharedSession = Arc<RwLock<RaceSession>>;

/// Create a new shared session
pub fn create_shared_session(config: RaceConfig) -> SharedSession {
    Arc::new(RwLock::new(RaceSession::new(config)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPAWN: Vec3 = Vec3::new(10.0, 0.2, 0.5);
    const BOUNDS: Vec3 = Vec3::new(0.0, 4.0, 5.0);

    fn racing_session() -> RaceSession {
        let mut session = RaceSession::new(RaceConfig::default());
        session.spawn_vehicle(SPAWN, 0.0, BOUNDS);
        session.start_race();
        // run out the countdown
        for _ in 0..COUNTDOWN_STEPS * COUNTDOWN_STEP_TICKS {
            session.tick();
        }
        assert_eq!(session.status(), RaceStatus::Racing);
        session
    }

    fn teleport(session: &mut RaceSession, x: f32, z: f32) {
        if let Some(vehicle) = &mut session.vehicle {
            vehicle.position.x = x;
            vehicle.position.z = z;
        }
    }

    #[test]
    fn tick_without_vehicle_is_a_no_op() {
        let mut session = RaceSession::new(RaceConfig::default());
        session.start_race();
        for _ in 0..200 {
            let snapshot = session.tick();
            assert!(snapshot.vehicle.is_none());
            assert!(snapshot.camera.is_none());
            assert_eq!(snapshot.laps_completed, 0);
        }
        assert_eq!(session.display().speed_display, 0);
    }

    #[test]
    fn vehicle_holds_still_until_go() {
        let mut session = RaceSession::new(RaceConfig::default());
        session.spawn_vehicle(SPAWN, 0.0, BOUNDS);
        session.set_control(Control::Forward, true);

        // not started at all
        session.tick();
        // counting down
        session.start_race();
        for _ in 0..COUNTDOWN_STEP_TICKS {
            session.tick();
        }
        let snapshot = session.snapshot();
        let vehicle = snapshot.vehicle.unwrap();
        assert_eq!(vehicle.speed, 0.0);
        assert_eq!(vehicle.position, SPAWN);

        // once racing, throttle bites
        for _ in 0..2 * COUNTDOWN_STEP_TICKS + 5 {
            session.tick();
        }
        assert!(session.snapshot().vehicle.unwrap().speed > 0.0);
    }

    #[test]
    fn countdown_message_sequence() {
        let mut session = RaceSession::new(RaceConfig::default());
        session.spawn_vehicle(SPAWN, 0.0, BOUNDS);
        assert_eq!(session.display().status_message, "");

        session.start_race();
        session.tick();
        assert_eq!(session.display().status_message, "3");
        for _ in 0..COUNTDOWN_STEP_TICKS {
            session.tick();
        }
        assert_eq!(session.display().status_message, "2");
        for _ in 0..COUNTDOWN_STEP_TICKS {
            session.tick();
        }
        assert_eq!(session.display().status_message, "1");
        // countdown elapses into GO!
        for _ in 0..COUNTDOWN_STEP_TICKS - 1 {
            session.tick();
        }
        assert_eq!(session.status(), RaceStatus::Racing);
        assert_eq!(session.display().status_message, "GO!");
        // and the GO! banner clears after another step
        for _ in 0..COUNTDOWN_STEP_TICKS {
            session.tick();
        }
        assert_eq!(session.display().status_message, "");
    }

    #[test]
    fn geofence_ignored_before_race_start() {
        let mut session = RaceSession::new(RaceConfig::default());
        session.spawn_vehicle(Vec3::new(0.0, 0.2, -70.0), 0.0, BOUNDS);
        for _ in 0..50 {
            session.tick();
        }
        teleport(&mut session, 0.0, -50.0);
        for _ in 0..50 {
            session.tick();
        }
        assert_eq!(session.snapshot().laps_completed, 0);
        assert!(!session.lap_tracker.inside_finish_zone());
    }

    #[test]
    fn full_race_to_finish() {
        let mut session = racing_session();

        for lap in 1..=3u32 {
            teleport(&mut session, 0.0, -70.0);
            session.tick();
            teleport(&mut session, 0.0, -50.0);
            session.tick();
            assert_eq!(session.snapshot().laps_completed, lap);
        }

        assert_eq!(session.status(), RaceStatus::Finished);
        let display = session.display();
        assert_eq!(display.status_message, "FINISH!");
        assert_eq!(display.laps_completed, 3);
        assert_eq!(display.speed_display, 0);
        assert_eq!(session.snapshot().vehicle.unwrap().speed, 0.0);
    }

    #[test]
    fn finished_race_stays_finished() {
        let mut session = racing_session();
        for _ in 0..3 {
            teleport(&mut session, 0.0, -70.0);
            session.tick();
            teleport(&mut session, 0.0, -50.0);
            session.tick();
        }
        assert_eq!(session.status(), RaceStatus::Finished);

        // further traversals and throttle change nothing
        session.set_control(Control::Forward, true);
        for _ in 0..5 {
            teleport(&mut session, 0.0, -70.0);
            session.tick();
            teleport(&mut session, 0.0, -50.0);
            session.tick();
        }
        assert_eq!(session.status(), RaceStatus::Finished);
        assert_eq!(session.snapshot().laps_completed, 3);
        assert_eq!(session.snapshot().vehicle.unwrap().speed, 0.0);
    }

    #[test]
    fn speed_display_is_scaled_absolute_speed() {
        let mut session = racing_session();
        if let Some(vehicle) = &mut session.vehicle {
            vehicle.speed = -0.42;
        }
        // display reads state directly, no tick needed
        assert_eq!(session.display().speed_display, 42);
    }

    #[test]
    fn camera_tracks_even_before_race_start() {
        let mut session = RaceSession::new(RaceConfig::default());
        session.spawn_vehicle(SPAWN, 0.0, BOUNDS);
        let before = session.snapshot().camera.unwrap().position;
        // drag the vehicle somewhere else; the camera should follow
        teleport(&mut session, 30.0, 30.0);
        for _ in 0..10 {
            session.tick();
        }
        let after = session.snapshot().camera.unwrap().position;
        assert!(before.distance(after) > 1.0);
    }

    #[test]
    fn pause_freezes_the_session() {
        let mut session = racing_session();
        session.set_control(Control::Forward, true);
        session.tick();
        let frozen = session.snapshot().vehicle.unwrap();

        session.pause();
        assert!(!session.is_running());
        for _ in 0..20 {
            session.tick();
        }
        let still = session.snapshot().vehicle.unwrap();
        assert_eq!(still.speed, frozen.speed);
        assert_eq!(still.position, frozen.position);

        session.resume();
        session.tick();
        assert!(session.snapshot().vehicle.unwrap().speed > frozen.speed);
    }

    #[test]
    fn reset_returns_to_fresh_state() {
        let mut session = racing_session();
        session.set_control(Control::Forward, true);
        for _ in 0..30 {
            session.tick();
        }
        session.reset();

        assert_eq!(session.status(), RaceStatus::NotStarted);
        let snapshot = session.snapshot();
        assert!(snapshot.vehicle.is_none());
        assert_eq!(snapshot.laps_completed, 0);
        // cleared input must not leak into the next run
        session.spawn_vehicle(SPAWN, 0.0, BOUNDS);
        session.start_race();
        for _ in 0..COUNTDOWN_STEPS * COUNTDOWN_STEP_TICKS + 10 {
            session.tick();
        }
        assert_eq!(session.snapshot().vehicle.unwrap().speed, 0.0);
    }

    #[test]
    fn snapshot_serializes_for_ipc() {
        let session = racing_session();
        let json = serde_json::to_string(&session.snapshot()).unwrap();
        assert!(json.contains("\"status\""));
        assert!(json.contains("\"laps_completed\""));
    }

    #[test]
    fn stats_report_nominal_tick_rate() {
        let mut session = racing_session();
        for _ in 0..10 {
            session.tick();
        }
        let stats = session.stats();
        assert_eq!(stats.tick_rate, TICK_RATE);
        assert_eq!(stats.status, RaceStatus::Racing);
        assert!(stats.avg_tick_time_ms >= 0.0);
    }
}
