//! Fleet-wide startup and the top-level run loop: connects to every
//! requested port, waits for enough vehicles to announce themselves, then
//! spawns one worker thread per discovered vehicle and waits for all of
//! them to finish. Grounded on `main()`/`establish_connections`/
//! `wait_systems` in the source.

use crate::barrier::{PhaseOutcome, SyncBarrier};
use crate::config::Config;
use crate::operation::CriticalFailure;
use crate::pipeline::{drone_handler, FleetContext};
use crate::search::SearchController;
use fleet_core::flag::FlagSource;
use fleet_core::{planners::MissionHelper, Polygon, QuorumTracker, ReturnCode};
use fleet_transport::ConnectionManager;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

/// Builds one `udp://:<port>` connection per requested port and fails the
/// whole run if any single connection cannot be established.
pub fn establish_connections(
    manager: &dyn ConnectionManager,
    ports: &[u16],
) -> Result<(), ReturnCode> {
    for port in ports {
        let url = format!("udp://:{port}");
        if manager.add_any_connection(&url).is_err() {
            error!(port, "failed to establish connection");
            return Err(ReturnCode::ConnectionFailed);
        }
    }
    Ok(())
}

/// Runs the full flag search across the fleet reachable on `ports`,
/// returning the overall process return code (critical failures propagate;
/// a vehicle's own non-critical failure does not change the overall code).
pub fn run_search<P, F>(
    manager: &dyn ConnectionManager,
    config: Config,
    ports: &[u16],
    search_area: Polygon,
    planner: P,
    flag: F,
) -> ReturnCode
where
    P: MissionHelper + Send + Sync + 'static,
    F: FlagSource + 'static,
{
    if let Err(code) = establish_connections(manager, ports) {
        return code;
    }

    let expected = ports.len() as u32;
    let vehicles = match manager.discover_systems(expected, config.max_waiting_time) {
        Ok(v) if !v.is_empty() => v,
        _ => {
            error!("no systems found within the waiting window");
            return ReturnCode::NoSystemsFound;
        }
    };

    let quorum = Arc::new(QuorumTracker::new(expected, config.percentage_drones_required));
    for _ in 0..vehicles.len() {
        quorum.append_system();
    }
    if !quorum.has_quorum() {
        error!("fewer systems discovered than required for quorum");
        return ReturnCode::NoSystemsFound;
    }

    let final_systems = vehicles.len() as u32;
    let search = Arc::new(SearchController::new(
        Arc::new(flag),
        config.mission_separation_deg * 50.0,
    ));

    let critical_failure = Arc::new(CriticalFailure::new());

    let quorum_for_barrier = quorum.clone();
    let critical_failure_for_barrier = critical_failure.clone();
    let barrier = Arc::new(SyncBarrier::new(final_systems, move || {
        if let Some(code) = critical_failure_for_barrier.get() {
            PhaseOutcome::AbortWithCode(code.code())
        } else if quorum_for_barrier.has_quorum() {
            PhaseOutcome::Continue
        } else {
            PhaseOutcome::AbortWithCode(ReturnCode::NoSystemsFound.code())
        }
    }));

    let ctx = Arc::new(FleetContext {
        config,
        quorum,
        search_area,
        planner: Arc::new(planner),
        search,
        upload_mutex: Arc::new(Mutex::new(())),
        final_systems,
        critical_failure,
    });

    info!(final_systems, "starting fleet search");

    let handles: Vec<_> = vehicles
        .into_iter()
        .enumerate()
        .map(|(i, vehicle)| {
            let system_id = i as u32 + 1;
            let ctx = ctx.clone();
            let barrier = barrier.clone();
            let vehicle: Arc<dyn fleet_transport::VehicleHandle> = Arc::from(vehicle);
            std::thread::spawn(move || drone_handler(system_id, vehicle, ctx, barrier))
        })
        .collect();

    let mut worst: Option<ReturnCode> = None;
    for handle in handles {
        if let Ok(code) = handle.join() {
            if !code.is_ok() && worst.is_none() {
                worst = Some(code);
            }
        }
    }

    if let Some(code) = barrier.aborted_code() {
        return code_from_i32(code);
    }
    worst.unwrap_or(ReturnCode::Ok)
}

fn code_from_i32(code: i32) -> ReturnCode {
    match code {
        0 => ReturnCode::Ok,
        1 => ReturnCode::BadArgument,
        2 => ReturnCode::ConnectionFailed,
        3 => ReturnCode::NoSystemsFound,
        4 => ReturnCode::TelemetryFailure,
        5 => ReturnCode::ActionFailure,
        6 => ReturnCode::OffboardFailure,
        7 => ReturnCode::MissionFailure,
        _ => ReturnCode::UnknownFailure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::Point;
    use fleet_transport::{MockConnectionManager, Position};

    fn pos() -> Position {
        Position { latitude_deg: 47.0, longitude_deg: 8.0, relative_altitude_m: 0.0 }
    }

    #[test]
    fn no_systems_found_when_discovery_is_empty() {
        let manager = MockConnectionManager::new(vec![]);
        let config = Config::default();
        let area = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]);
        let code = run_search(
            &manager,
            config,
            &[14540],
            area,
            fleet_core::GoCenter,
            fleet_core::FixedFlag::new(Point::new(0.5, 0.5)),
        );
        assert_eq!(code, ReturnCode::NoSystemsFound);
    }

    #[test]
    fn full_fleet_search_succeeds_with_healthy_mock_vehicles() {
        let manager = MockConnectionManager::new(vec![pos(), pos()]);
        let config = Config { refresh_time: std::time::Duration::from_millis(0), ..Config::default() };
        let area = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ]);
        let code = run_search(
            &manager,
            config,
            &[14540, 14541],
            area,
            fleet_core::GoCenter,
            fleet_core::FixedFlag::new(Point::new(99.0, 99.0)),
        );
        assert_eq!(code, ReturnCode::Ok);
    }
}
