//! Distributed flag-detection search controller.
//!
//! Every vehicle worker polls its own position against the shared flag
//! position; the first one to come within detection range claims the find
//! and every other worker's next check sees it as already cancelled. The
//! claim is at-most-once: [`SearchController::check_and_claim`] only ever
//! returns `true` for a single caller across the whole fleet. Workers share
//! one controller behind an `Arc`.

use fleet_core::flag::FlagSource;
use fleet_core::Point;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct SearchController<F: FlagSource> {
    flag: Arc<F>,
    detection_radius_deg: f64,
    found: AtomicBool,
}

impl<F: FlagSource> SearchController<F> {
    pub fn new(flag: Arc<F>, detection_radius_deg: f64) -> Self {
        SearchController { flag, detection_radius_deg, found: AtomicBool::new(false) }
    }

    /// Checks whether `position` is within detection range of the flag.
    /// Returns `true` only for the single caller that first detects it —
    /// the caller is then responsible for broadcasting the cancel. Every
    /// later call, from this vehicle or any other, returns `false` even
    /// while still in range, since the cancellation has already gone out.
    pub fn check_and_claim(&self, position: Point) -> bool {
        if self.found.load(Ordering::SeqCst) {
            return false;
        }
        let flag_position = self.flag.position();
        if position.distance(&flag_position) > self.detection_radius_deg {
            return false;
        }
        self.found.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.found.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::FixedFlag;

    #[test]
    fn first_vehicle_within_range_claims_the_find() {
        let flag = Arc::new(FixedFlag::new(Point::new(47.0, 8.0)));
        let controller = SearchController::new(flag, 0.001);
        assert!(controller.check_and_claim(Point::new(47.0, 8.0)));
    }

    #[test]
    fn claim_is_at_most_once_across_callers() {
        let flag = Arc::new(FixedFlag::new(Point::new(47.0, 8.0)));
        let controller = SearchController::new(flag, 0.001);
        assert!(controller.check_and_claim(Point::new(47.0, 8.0)));
        assert!(!controller.check_and_claim(Point::new(47.0, 8.0)));
        assert!(controller.is_cancelled());
    }

    #[test]
    fn out_of_range_position_does_not_claim() {
        let flag = Arc::new(FixedFlag::new(Point::new(47.0, 8.0)));
        let controller = SearchController::new(flag, 0.001);
        assert!(!controller.check_and_claim(Point::new(50.0, 10.0)));
        assert!(!controller.is_cancelled());
    }
}
