//! Fleet Core - Pure domain logic for the search-and-cover fleet
//!
//! This crate contains geometry, mission planning, and the quorum/error
//! taxonomy shared by the fleet orchestrator, with NO networking or
//! transport dependencies.

pub mod errors;
pub mod flag;
pub mod geo;
pub mod mission;
pub mod partition;
pub mod planners;
pub mod quorum;

pub use errors::{MissionPlanError, ReturnCode};
pub use flag::{FixedFlag, FlagSource, RandomFlag, RandomFlagPoly, SharedFlag};
pub use geo::{Line, Point, PointSide, Polygon, PolygonError, Segment, Vector, EPS};
pub use mission::{waypoint, CameraAction, MissionPlan, MissionWaypoint};
pub use partition::polygon_of_interest;
pub use planners::{GoCenter, MissionHelper, ParallelSweep, SpiralSweepCenter, SpiralSweepEdge};
pub use quorum::QuorumTracker;
