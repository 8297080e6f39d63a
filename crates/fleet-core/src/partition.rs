//! Splits a search area into `number_of_systems` equal-area regions and
//! hands back the one assigned to `system_id`.
//!
//! Grounded on `missionhelper.cpp`'s `get_polygon_of_interest`: scale
//! coordinates up, repeatedly call [`Polygon::split`] peeling off one
//! partial-area region at a time, then scale back down. The repeated
//! peeling means each cut only ever has to solve a two-region split, which
//! is all [`Polygon::split`] supports.

use crate::errors::MissionPlanError;
use crate::geo::{Point, Polygon};

/// Coordinates are scaled by this factor before splitting and divided back
/// down afterward, matching the source's `1e6` fixed-point workaround for
/// splitting lines that are numerically close together.
const SCALE: f64 = 1_000_000.0;

fn scale_up(poly: &Polygon, factor: f64) -> Polygon {
    Polygon::new(poly.vertices().iter().map(|p| Point::new(p.x * factor, p.y * factor)).collect())
}

fn scale_down(poly: &Polygon, factor: f64) -> Polygon {
    scale_up(poly, 1.0 / factor)
}

/// Returns the region of `area` assigned to `system_id`, where `system_id`
/// ranges over `1..=number_of_systems`.
///
/// `system_id == number_of_systems` receives the final remainder instead of
/// going through another split, since by that point only one region is
/// left to assign.
pub fn polygon_of_interest(
    area: &Polygon,
    system_id: u32,
    number_of_systems: u32,
) -> Result<Polygon, MissionPlanError> {
    if number_of_systems == 0 || system_id == 0 || system_id > number_of_systems {
        return Err(MissionPlanError::CannotMakeMission(format!(
            "system_id {system_id} out of range for {number_of_systems} systems"
        )));
    }

    let total = area.count_square();
    let partial_area = total / number_of_systems as f64;
    if partial_area <= 0.0 {
        return Err(MissionPlanError::CannotMakeMission("partial area is not positive".into()));
    }

    let mut remaining = scale_up(area, SCALE);
    let scaled_partial = partial_area * SCALE * SCALE;

    let iterations = system_id.min(number_of_systems - 1);
    let mut assigned: Option<Polygon> = None;

    for step in 1..=iterations {
        let (poly1, poly2, _cut) = remaining.split(scaled_partial)?;

        // The source compares the two candidates' raw area deltas against
        // the target without taking an absolute value, so whichever region
        // happens to sit closer from below wins ties; preserved verbatim.
        let interest_is_poly1 = (poly1.count_square() - scaled_partial)
            < (poly2.count_square() - scaled_partial);

        let (interest, rest) =
            if interest_is_poly1 { (poly1, poly2) } else { (poly2, poly1) };

        if step == system_id {
            assigned = Some(interest);
            break;
        }
        remaining = rest;
    }

    let result = assigned.unwrap_or(remaining);
    Ok(scale_down(&result, SCALE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square(side: f64) -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(side, 0.0),
            Point::new(side, side),
            Point::new(0.0, side),
        ])
    }

    #[test]
    fn four_way_partition_covers_total_area() {
        let area = unit_square(4.0);
        let mut total = 0.0;
        for id in 1..=4 {
            let region = polygon_of_interest(&area, id, 4).expect("partition should succeed");
            total += region.count_square();
        }
        assert!((total - area.count_square()).abs() < 1e-3);
    }

    #[test]
    fn single_system_gets_everything() {
        let area = unit_square(3.0);
        let region = polygon_of_interest(&area, 1, 1).unwrap();
        assert!((region.count_square() - area.count_square()).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_system_id_is_rejected() {
        let area = unit_square(2.0);
        assert!(polygon_of_interest(&area, 5, 4).is_err());
        assert!(polygon_of_interest(&area, 0, 4).is_err());
    }
}
