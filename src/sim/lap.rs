//! Lap - Finish-line crossing detection
//!
//! The finish zone is the slice of track directly behind the inner
//! radius. A lap counts only after a full traversal: entering the zone
//! latches a flag, and crossing back past the inner edge while latched
//! closes the lap. Jitter at either boundary can never double-count.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Race configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Laps required to finish
    pub total_laps: u32,
    /// Outer track radius (world units)
    pub outer_radius: f32,
    /// Inner track radius (world units)
    pub inner_radius: f32,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            total_laps: 3,
            outer_radius: 80.0,
            inner_radius: 60.0,
        }
    }
}

impl RaceConfig {
    /// Whether a position lies inside the finish-zone geofence.
    ///
    /// All comparisons are strict: a coordinate exactly on a boundary is
    /// outside the zone.
    pub fn in_finish_zone(&self, position: Vec3) -> bool {
        let half_width = (self.outer_radius - self.inner_radius) / 2.0;
        position.z < -self.inner_radius
            && position.z > -self.outer_radius
            && position.x.abs() < half_width
    }
}

/// Progress event produced when a lap closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LapEvent {
    /// A lap completed with more to go; carries the new count
    LapCompleted(u32),
    /// The final lap completed; the race is over
    RaceFinished,
}

/// Two-phase finish-line crossing detector.
#[derive(Debug, Clone)]
pub struct LapTracker {
    pub config: RaceConfig,
    laps_completed: u32,
    inside_finish_zone: bool,
}

impl LapTracker {
    pub fn new(config: RaceConfig) -> Self {
        Self {
            config,
            laps_completed: 0,
            inside_finish_zone: false,
        }
    }

    pub fn laps_completed(&self) -> u32 {
        self.laps_completed
    }

    /// Whether the zone-entry flag is currently latched.
    pub fn inside_finish_zone(&self) -> bool {
        self.inside_finish_zone
    }

    /// Feed one frame's vehicle position through the detector.
    ///
    /// The caller gates this on the race being active; the tracker itself
    /// is a pure crossing detector.
    pub fn check(&mut self, position: Vec3) -> Option<LapEvent> {
        if self.config.in_finish_zone(position) && !self.inside_finish_zone {
            self.inside_finish_zone = true;
        }

        if position.z > -self.config.inner_radius && self.inside_finish_zone {
            self.laps_completed += 1;
            self.inside_finish_zone = false;
            if self.laps_completed >= self.config.total_laps {
                return Some(LapEvent::RaceFinished);
            }
            return Some(LapEvent::LapCompleted(self.laps_completed));
        }

        None
    }

    /// Return to zero laps with the latch clear.
    pub fn reset(&mut self) {
        self.laps_completed = 0;
        self.inside_finish_zone = false;
    }
}
