//! Process-wide metrics.
//!
//! Recorded through the `metrics` facade; without an installed recorder the
//! calls are no-ops.

use acw_models::WorkerKind;
use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const VENDOR_CALL_DURATION_SECONDS: &str = "acw_vendor_call_duration_seconds";
    pub const INVOCATIONS_TOTAL: &str = "acw_invocations_total";
}

/// Record the latency of one vendor call.
pub fn record_vendor_call(worker: WorkerKind, duration_secs: f64) {
    let labels = [("worker", worker.as_str().to_string())];
    histogram!(names::VENDOR_CALL_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a finished invocation. `outcome` is `success` or an error kind.
pub fn record_invocation(worker: WorkerKind, outcome: &str) {
    let labels = [
        ("worker", worker.as_str().to_string()),
        ("outcome", outcome.to_string()),
    ];
    counter!(names::INVOCATIONS_TOTAL, &labels).increment(1);
}
