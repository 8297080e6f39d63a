//! Fleet Transport - Blocking autopilot connection and vehicle control
//!
//! Provides the [`VehicleHandle`]/[`ConnectionManager`] abstraction the
//! orchestrator drives one OS thread per vehicle against, plus a
//! [`MockVehicle`] implementation for tests and dry-run mode.

pub mod handle;
pub mod mock;

pub use handle::{ConnectionManager, LandedState, MissionProgress, Position, VehicleHandle};
pub use mock::{MockConnectionManager, MockVehicle};
