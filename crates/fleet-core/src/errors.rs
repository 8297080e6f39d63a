//! Process-wide return code taxonomy.
//!
//! Consolidates the two near-duplicate `ProRetCod` hierarchies the source
//! carried (one in its `operation` library, one in its `errorcontrol`
//! library) into the single enum below.

use thiserror::Error;

/// A structured process return code: an integer exit code plus a
/// human-readable message, matching §7 of the specification exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReturnCode {
    #[error("ok")]
    Ok,
    #[error("bad argument")]
    BadArgument,
    #[error("connection failed")]
    ConnectionFailed,
    #[error("no systems found")]
    NoSystemsFound,
    #[error("telemetry failure")]
    TelemetryFailure,
    #[error("action failure")]
    ActionFailure,
    #[error("offboard failure")]
    OffboardFailure,
    #[error("mission failure")]
    MissionFailure,
    #[error("unknown failure")]
    UnknownFailure,
}

impl ReturnCode {
    pub fn code(&self) -> i32 {
        match self {
            ReturnCode::Ok => 0,
            ReturnCode::BadArgument => 1,
            ReturnCode::ConnectionFailed => 2,
            ReturnCode::NoSystemsFound => 3,
            ReturnCode::TelemetryFailure => 4,
            ReturnCode::ActionFailure => 5,
            ReturnCode::OffboardFailure => 6,
            ReturnCode::MissionFailure => 7,
            ReturnCode::UnknownFailure => 255,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ReturnCode::Ok)
    }
}

impl Default for ReturnCode {
    fn default() -> Self {
        ReturnCode::Ok
    }
}

/// Geometry-layer errors raised internally by the polygon engine and
/// partitioner, translated to a [`ReturnCode`] at the pipeline boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MissionPlanError {
    #[error(transparent)]
    Polygon(#[from] crate::geo::PolygonError),
    #[error("cannot make mission: {0}")]
    CannotMakeMission(String),
}

impl MissionPlanError {
    /// The original translates planning failures to `MissionFailure`
    /// generally, and to `ActionFailure` specifically when they originate
    /// from the planner rather than from `get_polygon_of_interest` itself.
    pub fn as_return_code(&self) -> ReturnCode {
        ReturnCode::MissionFailure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_taxonomy() {
        assert_eq!(ReturnCode::Ok.code(), 0);
        assert_eq!(ReturnCode::BadArgument.code(), 1);
        assert_eq!(ReturnCode::ConnectionFailed.code(), 2);
        assert_eq!(ReturnCode::NoSystemsFound.code(), 3);
        assert_eq!(ReturnCode::TelemetryFailure.code(), 4);
        assert_eq!(ReturnCode::ActionFailure.code(), 5);
        assert_eq!(ReturnCode::OffboardFailure.code(), 6);
        assert_eq!(ReturnCode::MissionFailure.code(), 7);
        assert_eq!(ReturnCode::UnknownFailure.code(), 255);
    }

    #[test]
    fn default_is_ok() {
        assert!(ReturnCode::default().is_ok());
    }
}
