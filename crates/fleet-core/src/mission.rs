//! Wire-shape mission items a planner hands to the autopilot transport.

use crate::geo::Point;
use serde::{Deserialize, Serialize};

/// One waypoint in a mission plan, with the fixed defaults the source's
/// `MissionItem` constructor always passed (see spec §4.8): 5 m/s speed,
/// stop-and-hover (not fly-through), gimbal pitch 20°/yaw 60°, no camera
/// action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionWaypoint {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub relative_altitude_m: f32,
    pub speed_m_s: f32,
    pub is_fly_through: bool,
    pub gimbal_pitch_deg: f32,
    pub gimbal_yaw_deg: f32,
    pub camera_action: CameraAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraAction {
    None,
    TakePhoto,
}

/// Builds a waypoint at `point` and `altitude_m`, applying the planners'
/// shared fixed defaults.
pub fn waypoint(point: Point, altitude_m: f32) -> MissionWaypoint {
    MissionWaypoint {
        latitude_deg: point.x,
        longitude_deg: point.y,
        relative_altitude_m: altitude_m,
        speed_m_s: 5.0,
        is_fly_through: false,
        gimbal_pitch_deg: 20.0,
        gimbal_yaw_deg: 60.0,
        camera_action: CameraAction::None,
    }
}

/// A complete ordered mission plan for one vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionPlan {
    pub items: Vec<MissionWaypoint>,
}

impl MissionPlan {
    pub fn new(items: Vec<MissionWaypoint>) -> Self {
        MissionPlan { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
