//! Shared library surface for the fleet orchestrator binary and its tests.

pub mod barrier;
pub mod config;
pub mod fleet;
pub mod operation;
pub mod pipeline;
pub mod search;

pub use barrier::{PhaseOutcome, SyncBarrier};
pub use config::Config;
pub use fleet::{establish_connections, run_search};
pub use operation::{run_stage, CriticalFailure, OperationOutcome, OperationState};
pub use pipeline::{drone_handler, FleetContext};
pub use search::SearchController;
