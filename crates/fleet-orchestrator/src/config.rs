//! Search run configuration from environment.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// How many times a pipeline stage retries before giving up on a
    /// vehicle, matching the source's `MAX_ATTEMPTS`.
    pub max_attempts: u32,
    /// Delay between retries within a stage, and the duration the global
    /// mission-upload mutex is deliberately held for after each upload.
    pub refresh_time: Duration,
    /// How long `wait_systems` waits for new vehicles to announce
    /// themselves before giving up on reaching `expected_systems`.
    pub max_waiting_time: Duration,
    /// Minimum percentage of the originally-discovered fleet that must
    /// remain for the search to continue.
    pub percentage_drones_required: u32,
    /// Spacing, in degrees, between successive arms of a spiral sweep or
    /// lines of a parallel sweep.
    pub mission_separation_deg: f64,
    /// Base return-to-launch altitude in meters, before the per-vehicle
    /// `system_id` stagger (`BASE_RETURN_ALTITUDE` in spec §6).
    pub base_return_altitude_m: f32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            max_attempts: env::var("FLEET_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            refresh_time: Duration::from_millis(
                env::var("FLEET_REFRESH_TIME_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1000),
            ),
            max_waiting_time: Duration::from_secs(
                env::var("FLEET_MAX_WAITING_TIME_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            percentage_drones_required: env::var("FLEET_PERCENTAGE_DRONES_REQUIRED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(66),
            mission_separation_deg: env::var("FLEET_MISSION_SEPARATION_DEG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.0002),
            base_return_altitude_m: env::var("FLEET_BASE_RETURN_ALTITUDE_M")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10.0),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_attempts: 10,
            refresh_time: Duration::from_millis(1000),
            max_waiting_time: Duration::from_secs(10),
            percentage_drones_required: 66,
            mission_separation_deg: 0.0002,
            base_return_altitude_m: 10.0,
        }
    }
}
