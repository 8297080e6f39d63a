//! The ten-stage per-vehicle pipeline and the barrier-synchronized worker
//! that drives it. Grounded on `drone_handler`/`operation_*` in the
//! source's `main.cpp`: every stage runs to completion (with its own
//! bounded retry) for every vehicle before any vehicle moves on to the
//! next stage, via [`crate::barrier::SyncBarrier::arrive_and_wait`]. A
//! vehicle whose stage fails beyond recovery calls `arrive_and_drop`
//! instead and exits its worker thread early.

use crate::barrier::{PhaseOutcome, SyncBarrier};
use crate::config::Config;
use crate::operation::{run_stage, CriticalFailure, OperationState};
use crate::search::SearchController;
use fleet_core::flag::FlagSource;
use fleet_core::{planners::MissionHelper, polygon_of_interest, Point, Polygon, QuorumTracker, ReturnCode};
use fleet_transport::{LandedState, VehicleHandle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

/// Shared context every vehicle worker reads from; cloned (cheaply, behind
/// `Arc`) into each worker thread.
pub struct FleetContext<P, F>
where
    P: MissionHelper + Send + Sync,
    F: FlagSource,
{
    pub config: Config,
    pub quorum: Arc<QuorumTracker>,
    pub search_area: Polygon,
    pub planner: Arc<P>,
    pub search: Arc<SearchController<F>>,
    /// The source serializes mission uploads behind one global mutex and
    /// deliberately sleeps `refresh_time` while still holding it, to give
    /// the autopilot's onboard storage time to settle between uploads.
    pub upload_mutex: Arc<Mutex<()>>,
    pub final_systems: u32,
    /// Fleet-wide record the barrier's completion hook consults to decide
    /// whether to abort the whole run, and with which code.
    pub critical_failure: Arc<CriticalFailure>,
}

/// Runs every stage for one vehicle, synchronizing with the rest of the
/// fleet via `barrier` between stages. Returns the vehicle's final
/// [`fleet_core::ReturnCode`].
#[allow(clippy::too_many_arguments)]
pub fn drone_handler<P, F>(
    system_id: u32,
    vehicle: Arc<dyn VehicleHandle>,
    ctx: Arc<FleetContext<P, F>>,
    barrier: Arc<SyncBarrier<impl Fn() -> PhaseOutcome + Send + Sync>>,
) -> ReturnCode
where
    P: MissionHelper + Send + Sync,
    F: FlagSource,
{
    let operation = OperationState::new();
    let cfg = &ctx.config;

    macro_rules! stage {
        ($name:literal, $code:expr, $critical:expr, $body:expr) => {{
            let ok = run_stage(
                &operation,
                &ctx.quorum,
                $name,
                $code,
                $critical,
                cfg.max_attempts,
                cfg.refresh_time,
                $body,
            );
            if !ok {
                let outcome = operation.get();
                if outcome.critical {
                    ctx.critical_failure.record(outcome.code);
                }
                barrier.arrive_and_drop();
                return outcome.code;
            }
            if barrier.arrive_and_wait().is_some() {
                return operation.get().code;
            }
        }};
    }

    // Stages 1-5: per-spec §4.5, a transient failure here only aborts the
    // whole run if it costs the fleet its quorum.
    stage!("check_system_health", ReturnCode::TelemetryFailure, false, || {
        if vehicle.health_all_ok()? { Ok(()) } else { Err(anyhow::anyhow!("unhealthy")) }
    });

    stage!("clear_existing_missions", ReturnCode::MissionFailure, false, || {
        vehicle.clear_mission()
    });

    stage!("set_return_to_launch", ReturnCode::ActionFailure, false, || {
        vehicle.set_return_to_launch_after_mission(true)
    });

    stage!("set_return_to_launch_altitude", ReturnCode::ActionFailure, false, || {
        vehicle.set_return_to_launch_altitude(cfg.base_return_altitude_m + system_id as f32)
    });

    stage!("set_mission_controller", ReturnCode::TelemetryFailure, false, || {
        vehicle.set_rate_position(1.0)
    });

    // Stages 6-9: per spec §4.5/§7, plan synthesis, upload, arm, and
    // start-mission failures are critical regardless of quorum.
    let mut plan = None;
    stage!("make_mission_plan", ReturnCode::MissionFailure, true, || {
        let region = polygon_of_interest(&ctx.search_area, system_id, ctx.final_systems)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        let built = ctx
            .planner
            .new_mission(&region, system_id)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        plan = Some(built);
        Ok(())
    });
    let plan = match plan {
        Some(p) => p,
        None => return operation.get().code,
    };

    stage!("set_mission_plan", ReturnCode::MissionFailure, true, || {
        let _guard = ctx.upload_mutex.lock().unwrap();
        let result = vehicle.upload_mission(&plan);
        std::thread::sleep(cfg.refresh_time);
        result
    });

    stage!("arm_systems", ReturnCode::ActionFailure, true, || vehicle.arm());

    stage!("start_mission", ReturnCode::MissionFailure, true, || vehicle.start_mission());

    let wait_result = wait_until_mission_ends(&vehicle, &ctx, system_id, cfg.max_waiting_time);
    if let Err(_err) = wait_result {
        barrier.arrive_and_drop();
        operation.set_failure("wait_until_mission_ends", ReturnCode::MissionFailure, false);
        return operation.get().code;
    }
    if barrier.arrive_and_wait().is_some() {
        return operation.get().code;
    }

    ReturnCode::Ok
}

/// Blocks on mission progress, then on landed-state InAir, then on
/// landed-state OnGround, polling the shared search controller in between
/// so a flag detected by any vehicle stops this one's mission early.
fn wait_until_mission_ends<P, F>(
    vehicle: &Arc<dyn VehicleHandle>,
    ctx: &Arc<FleetContext<P, F>>,
    system_id: u32,
    timeout: Duration,
) -> anyhow::Result<()>
where
    P: MissionHelper + Send + Sync,
    F: FlagSource,
{
    let position_rx = vehicle.subscribe_position()?;
    let progress_rx = vehicle.subscribe_mission_progress()?;

    for progress in progress_rx.iter() {
        if let Ok(pos) = position_rx.try_recv() {
            let point = Point::new(pos.latitude_deg, pos.longitude_deg);
            if ctx.search.check_and_claim(point) {
                info!(system_id, "flag detected, broadcasting cancel to the fleet");
            }
            if ctx.search.is_cancelled() {
                info!(system_id, "search cancelled, returning to launch");
                vehicle.return_to_launch()?;
                break;
            }
        }
        if progress.is_complete() {
            break;
        }
    }

    let landed_rx = vehicle.subscribe_landed_state()?;
    let deadline = std::time::Instant::now() + timeout;
    let mut saw_in_air = false;
    while std::time::Instant::now() < deadline {
        match landed_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(LandedState::InAir) => saw_in_air = true,
            Ok(LandedState::OnGround) if saw_in_air => return Ok(()),
            Ok(_) => {}
            Err(_) => {
                if saw_in_air {
                    warn!(system_id, "timed out waiting for landing confirmation");
                }
            }
        }
    }
    Ok(())
}
