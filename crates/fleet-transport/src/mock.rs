//! In-process vehicle simulator used by tests and dry-run mode: accepts
//! every command immediately and reports a scripted happy-path telemetry
//! sequence.

use crate::handle::{ConnectionManager, LandedState, MissionProgress, Position, VehicleHandle};
use anyhow::Result;
use fleet_core::MissionPlan;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A scripted, in-process stand-in for a connected autopilot.
pub struct MockVehicle {
    system_id: u32,
    healthy: bool,
    position: Position,
    mission_len: Mutex<usize>,
}

impl MockVehicle {
    pub fn new(system_id: u32, position: Position) -> Self {
        MockVehicle { system_id, healthy: true, position, mission_len: Mutex::new(0) }
    }

    pub fn unhealthy(system_id: u32, position: Position) -> Self {
        MockVehicle { system_id, healthy: false, position, mission_len: Mutex::new(0) }
    }
}

impl VehicleHandle for MockVehicle {
    fn system_id(&self) -> u32 {
        self.system_id
    }

    fn health_all_ok(&self) -> Result<bool> {
        Ok(self.healthy)
    }

    fn set_rate_position(&self, _rate_hz: f64) -> Result<()> {
        Ok(())
    }

    fn subscribe_position(&self) -> Result<Receiver<Position>> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(self.position);
        Ok(rx)
    }

    fn subscribe_landed_state(&self) -> Result<Receiver<LandedState>> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(LandedState::OnGround);
        let _ = tx.send(LandedState::InAir);
        let _ = tx.send(LandedState::OnGround);
        Ok(rx)
    }

    fn subscribe_mission_progress(&self) -> Result<Receiver<MissionProgress>> {
        let total = *self.mission_len.lock().unwrap() as i32;
        let (tx, rx) = mpsc::channel();
        for current in 0..=total {
            let _ = tx.send(MissionProgress { current, total });
        }
        Ok(rx)
    }

    fn clear_mission(&self) -> Result<()> {
        *self.mission_len.lock().unwrap() = 0;
        Ok(())
    }

    fn upload_mission(&self, plan: &MissionPlan) -> Result<()> {
        *self.mission_len.lock().unwrap() = plan.len();
        Ok(())
    }

    fn set_return_to_launch_after_mission(&self, _enabled: bool) -> Result<()> {
        Ok(())
    }

    fn set_return_to_launch_altitude(&self, _altitude_m: f32) -> Result<()> {
        Ok(())
    }

    fn arm(&self) -> Result<()> {
        Ok(())
    }

    fn start_mission(&self) -> Result<()> {
        Ok(())
    }

    fn return_to_launch(&self) -> Result<()> {
        Ok(())
    }
}

/// Hands back a fixed, pre-registered fleet of [`MockVehicle`]s instead of
/// discovering them over a real link.
pub struct MockConnectionManager {
    fleet: Arc<Mutex<Vec<Position>>>,
}

impl MockConnectionManager {
    pub fn new(positions: Vec<Position>) -> Self {
        MockConnectionManager { fleet: Arc::new(Mutex::new(positions)) }
    }
}

impl ConnectionManager for MockConnectionManager {
    fn add_any_connection(&self, _url: &str) -> Result<()> {
        Ok(())
    }

    fn discover_systems(
        &self,
        expected: u32,
        _timeout: Duration,
    ) -> Result<Vec<Box<dyn VehicleHandle>>> {
        let fleet = self.fleet.lock().unwrap();
        Ok(fleet
            .iter()
            .take(expected as usize)
            .enumerate()
            .map(|(i, pos)| Box::new(MockVehicle::new(i as u32 + 1, *pos)) as Box<dyn VehicleHandle>)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position { latitude_deg: 47.0, longitude_deg: 8.0, relative_altitude_m: 20.0 }
    }

    #[test]
    fn mock_vehicle_reports_healthy_by_default() {
        let v = MockVehicle::new(1, pos());
        assert!(v.health_all_ok().unwrap());
    }

    #[test]
    fn mock_vehicle_mission_progress_reaches_completion() {
        let v = MockVehicle::new(1, pos());
        let plan = MissionPlan::new(vec![]);
        v.upload_mission(&plan).unwrap();
        let rx = v.subscribe_mission_progress().unwrap();
        let last = rx.iter().last().unwrap();
        assert!(last.is_complete() || last.total == 0);
    }

    #[test]
    fn discover_systems_caps_at_expected_count() {
        let mgr = MockConnectionManager::new(vec![pos(), pos(), pos()]);
        let systems = mgr.discover_systems(2, Duration::from_secs(1)).unwrap();
        assert_eq!(systems.len(), 2);
    }
}
