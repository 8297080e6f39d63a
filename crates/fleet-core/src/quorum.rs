//! Tracks how many discovered vehicles remain in the fleet and whether
//! enough of them survive to keep the search viable.
//!
//! Grounded on the source's `PercentageCheck`: a running count of appended
//! systems compared against `expected * percentage / 100`, reevaluated
//! every time a system is appended or subtracted.

use std::sync::Mutex;

/// Minimum fraction of the originally-discovered fleet that must remain for
/// the search to continue, expressed as a whole-number percentage (0-100).
#[derive(Debug)]
pub struct QuorumTracker {
    expected: u32,
    percentage_required: u32,
    current: Mutex<u32>,
}

impl QuorumTracker {
    pub fn new(expected: u32, percentage_required: u32) -> Self {
        QuorumTracker { expected, percentage_required, current: Mutex::new(0) }
    }

    fn required(&self) -> u32 {
        (self.expected * self.percentage_required) / 100
    }

    pub fn append_system(&self) {
        let mut n = self.current.lock().unwrap();
        *n += 1;
    }

    pub fn subtract_system(&self) {
        let mut n = self.current.lock().unwrap();
        *n = n.saturating_sub(1);
    }

    pub fn count(&self) -> u32 {
        *self.current.lock().unwrap()
    }

    pub fn has_quorum(&self) -> bool {
        self.count() >= self.required()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quorum_met_at_threshold() {
        let q = QuorumTracker::new(10, 50);
        for _ in 0..5 {
            q.append_system();
        }
        assert!(q.has_quorum());
    }

    #[test]
    fn quorum_lost_after_subtraction() {
        let q = QuorumTracker::new(10, 80);
        for _ in 0..8 {
            q.append_system();
        }
        assert!(q.has_quorum());
        q.subtract_system();
        q.subtract_system();
        assert!(!q.has_quorum());
    }

    #[test]
    fn subtract_below_zero_saturates() {
        let q = QuorumTracker::new(4, 100);
        q.subtract_system();
        assert_eq!(q.count(), 0);
    }
}
