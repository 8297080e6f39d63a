//! Blocking autopilot transport abstraction.
//!
//! Mirrors the plugin grouping of a typical autopilot SDK (action, mission,
//! telemetry) but every operation is a blocking call returning
//! `anyhow::Result`. The fleet orchestrator drives one OS thread per
//! vehicle, so there is no cooperative single-threaded event loop here to
//! make an async interface worthwhile.

use anyhow::Result;
use fleet_core::MissionPlan;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// Ground/air state as reported by the vehicle's autopilot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandedState {
    Unknown,
    OnGround,
    InAir,
    TakingOff,
    Landing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub relative_altitude_m: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissionProgress {
    pub current: i32,
    pub total: i32,
}

impl MissionProgress {
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.current >= self.total
    }
}

/// A single connected autopilot system, addressed over whatever link
/// [`ConnectionManager::add_any_connection`] established.
pub trait VehicleHandle: Send + Sync {
    fn system_id(&self) -> u32;

    /// True only when every health check (gyrometer, accelerometer, local
    /// position estimate, home position, global position, armable) passes.
    fn health_all_ok(&self) -> Result<bool>;

    fn set_rate_position(&self, rate_hz: f64) -> Result<()>;
    fn subscribe_position(&self) -> Result<Receiver<Position>>;
    fn subscribe_landed_state(&self) -> Result<Receiver<LandedState>>;
    fn subscribe_mission_progress(&self) -> Result<Receiver<MissionProgress>>;

    fn clear_mission(&self) -> Result<()>;
    fn upload_mission(&self, plan: &MissionPlan) -> Result<()>;
    fn set_return_to_launch_after_mission(&self, enabled: bool) -> Result<()>;
    fn set_return_to_launch_altitude(&self, altitude_m: f32) -> Result<()>;

    fn arm(&self) -> Result<()>;
    fn start_mission(&self) -> Result<()>;
    fn return_to_launch(&self) -> Result<()>;
}

/// Establishes connections and waits for systems to announce themselves,
/// mirroring `establish_connections`/`wait_systems`.
pub trait ConnectionManager {
    fn add_any_connection(&self, url: &str) -> Result<()>;

    /// Blocks until `expected` systems have connected or `timeout` elapses,
    /// returning however many were actually discovered.
    fn discover_systems(
        &self,
        expected: u32,
        timeout: Duration,
    ) -> Result<Vec<Box<dyn VehicleHandle>>>;
}
