//! Per-vehicle operation state and the retry wrapper every pipeline stage
//! runs through.
//!
//! Grounded on the source's `operation_*` family: each stage attempts its
//! action, and on failure retries up to `max_attempts` times spaced by
//! `refresh_time` before giving up, subtracting this vehicle from the fleet
//! quorum and marking the failure critical only if quorum is now lost.

use fleet_core::{QuorumTracker, ReturnCode};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

/// The accumulated outcome of a vehicle's pipeline run: the last stage's
/// name, its return code, and whether that failure was critical enough to
/// abort the whole search.
#[derive(Debug, Clone)]
pub struct OperationOutcome {
    pub stage: &'static str,
    pub code: ReturnCode,
    pub critical: bool,
}

impl OperationOutcome {
    pub fn ok() -> Self {
        OperationOutcome { stage: "ok", code: ReturnCode::Ok, critical: false }
    }
}

/// Mutex-guarded latest status for one vehicle's pipeline, read by the
/// barrier's completion hook to decide whether to abort the search.
#[derive(Debug)]
pub struct OperationState {
    outcome: Mutex<OperationOutcome>,
}

impl OperationState {
    pub fn new() -> Self {
        OperationState { outcome: Mutex::new(OperationOutcome::ok()) }
    }

    pub fn set_failure(&self, stage: &'static str, code: ReturnCode, critical: bool) {
        *self.outcome.lock().unwrap() = OperationOutcome { stage, code, critical };
    }

    pub fn get(&self) -> OperationOutcome {
        self.outcome.lock().unwrap().clone()
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.lock().unwrap().code.is_ok()
    }
}

impl Default for OperationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Fleet-wide record of the first critical stage failure, read once by the
/// barrier's completion hook to decide whether — and with which code — to
/// abort the whole run. Grounded on the source's single shared
/// `OperationState`, whose `critical` flag the barrier's `sync_handler`
/// reads to decide whether to `exit()` the process.
#[derive(Debug, Default)]
pub struct CriticalFailure {
    code: Mutex<Option<ReturnCode>>,
}

impl CriticalFailure {
    pub fn new() -> Self {
        CriticalFailure { code: Mutex::new(None) }
    }

    /// Records `code` as the abort reason, if none has been recorded yet.
    pub fn record(&self, code: ReturnCode) {
        let mut guard = self.code.lock().unwrap();
        if guard.is_none() {
            *guard = Some(code);
        }
    }

    pub fn get(&self) -> Option<ReturnCode> {
        *self.code.lock().unwrap()
    }
}

/// Runs `attempt` up to `max_attempts` times, sleeping `refresh_time`
/// between tries. On final failure, records the outcome against
/// `operation` and subtracts this vehicle from `quorum`. The failure is
/// critical either when `force_critical` says this stage is always
/// critical (plan synthesis, upload, arm, start-mission per spec §4.5/§7)
/// or when the vehicle loss just cost the fleet its quorum.
#[allow(clippy::too_many_arguments)]
pub fn run_stage<E>(
    operation: &OperationState,
    quorum: &QuorumTracker,
    stage: &'static str,
    failure_code: ReturnCode,
    force_critical: bool,
    max_attempts: u32,
    refresh_time: Duration,
    mut attempt: impl FnMut() -> Result<(), E>,
) -> bool {
    for try_number in 0..max_attempts {
        match attempt() {
            Ok(()) => return true,
            Err(_) if try_number + 1 < max_attempts => {
                thread::sleep(refresh_time);
            }
            Err(_) => {}
        }
    }

    quorum.subtract_system();
    let critical = force_critical || !quorum.has_quorum();
    operation.set_failure(stage, failure_code, critical);
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[test]
    fn stage_succeeds_without_exhausting_attempts() {
        let operation = OperationState::new();
        let quorum = QuorumTracker::new(4, 50);
        let calls = AtomicU32::new(0);

        let ok = run_stage(&operation, &quorum, "health_check", ReturnCode::TelemetryFailure, false, 3, Duration::from_millis(0), || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<(), ()>(())
        });

        assert!(ok);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(operation.is_ok());
    }

    #[test]
    fn stage_records_non_critical_failure_above_quorum() {
        let operation = OperationState::new();
        let quorum = QuorumTracker::new(4, 50);
        for _ in 0..4 {
            quorum.append_system();
        }

        let ok = run_stage(&operation, &quorum, "health_check", ReturnCode::TelemetryFailure, false, 2, Duration::from_millis(0), || Err::<(), ()>(()));

        assert!(!ok);
        let outcome = operation.get();
        assert_eq!(outcome.code, ReturnCode::TelemetryFailure);
        assert!(!outcome.critical);
    }

    #[test]
    fn stage_marks_critical_once_quorum_lost() {
        let operation = OperationState::new();
        let quorum = QuorumTracker::new(4, 100);
        for _ in 0..4 {
            quorum.append_system();
        }

        let ok = run_stage(&operation, &quorum, "arm", ReturnCode::ActionFailure, false, 1, Duration::from_millis(0), || Err::<(), ()>(()));

        assert!(!ok);
        assert!(operation.get().critical);
    }

    #[test]
    fn force_critical_stage_aborts_even_with_quorum_intact() {
        let operation = OperationState::new();
        let quorum = QuorumTracker::new(4, 50);
        for _ in 0..4 {
            quorum.append_system();
        }

        let ok = run_stage(&operation, &quorum, "arm", ReturnCode::ActionFailure, true, 1, Duration::from_millis(0), || Err::<(), ()>(()));

        assert!(!ok);
        assert!(quorum.has_quorum());
        assert!(operation.get().critical);
    }

    #[test]
    fn critical_failure_records_only_the_first_code() {
        let cf = CriticalFailure::new();
        cf.record(ReturnCode::MissionFailure);
        cf.record(ReturnCode::ActionFailure);
        assert_eq!(cf.get(), Some(ReturnCode::MissionFailure));
    }
}
