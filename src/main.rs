//! Headless demo driver.
//!
//! Runs a scripted race: spawns the vehicle, starts the countdown, then
//! steers toward a point ahead on the track centerline until three laps
//! are done. Prints the HUD line whenever it changes and the final
//! snapshot as JSON.

use circuit_racer::{Control, RaceConfig, RaceSession, RaceStatus, TICK_RATE};
use glam::Vec3;

/// Lookahead along the centerline (radians of track angle)
const LOOKAHEAD: f32 = 0.3;
/// Steering deadband (radians)
const DEADBAND: f32 = 0.01;

/// Press left/right so the car chases a point ahead on the centerline.
fn steer_along_track(session: &mut RaceSession, config: &RaceConfig) {
    let Some(vehicle) = session.snapshot().vehicle else {
        return;
    };
    let center_radius = (config.outer_radius + config.inner_radius) / 2.0;

    let track_angle = vehicle.position.x.atan2(vehicle.position.z);
    let ahead = track_angle + LOOKAHEAD;
    let target_x = center_radius * ahead.sin();
    let target_z = center_radius * ahead.cos();

    let desired = (target_x - vehicle.position.x).atan2(target_z - vehicle.position.z);
    let diff = (desired - vehicle.heading + std::f32::consts::PI)
        .rem_euclid(std::f32::consts::TAU)
        - std::f32::consts::PI;

    session.set_control(Control::TurnLeft, diff > DEADBAND);
    session.set_control(Control::TurnRight, diff < -DEADBAND);
}

fn main() {
    env_logger::init();

    let config = RaceConfig::default();
    let mut session = RaceSession::new(config.clone());
    session.spawn_vehicle(Vec3::new(10.0, 0.2, 0.5), 0.0, Vec3::new(0.0, 4.0, 5.0));
    session.start_race();
    session.set_control(Control::Forward, true);

    let mut last_hud = String::new();
    // cap the run; three laps of the default circuit take well under this
    let max_ticks = (TICK_RATE as u32) * 60 * 10;

    for tick in 0..max_ticks {
        steer_along_track(&mut session, &config);
        let snapshot = session.tick();

        let display = session.display();
        let hud = format!(
            "lap {}/{} speed {:>3} {}",
            display.laps_completed, display.total_laps, display.speed_display, display.status_message
        );
        if hud != last_hud {
            println!("[{:>6.1}s] {hud}", tick as f32 / TICK_RATE);
            last_hud = hud;
        }

        if snapshot.status == RaceStatus::Finished {
            let json = serde_json::to_string_pretty(&snapshot)
                .unwrap_or_else(|e| format!("snapshot serialization failed: {e}"));
            println!("{json}");
            let stats = session.stats();
            println!("avg tick time: {:.4} ms", stats.avg_tick_time_ms);
            return;
        }
    }

    eprintln!("race did not finish within the tick budget");
}
