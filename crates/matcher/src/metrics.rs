use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Duration;

/// Metrics observer for verification calls.
///
/// Implementations must be cheap; the recorder is invoked on every
/// verification, inside the request path.
pub trait VerifyMetrics: Send + Sync {
    /// Record one verification: wall-clock latency, number of records whose
    /// distance was computed, and whether the probe matched.
    fn record_verify(&self, latency: Duration, compared: usize, matched: bool);
}

static RECORDER: OnceCell<Arc<dyn VerifyMetrics>> = OnceCell::new();

/// Install the process-wide metrics recorder. The first call wins; later
/// calls return the rejected recorder.
pub fn set_verify_metrics(recorder: Arc<dyn VerifyMetrics>) -> Result<(), Arc<dyn VerifyMetrics>> {
    RECORDER.set(recorder)
}

pub(crate) fn metrics_recorder() -> Option<&'static Arc<dyn VerifyMetrics>> {
    RECORDER.get()
}
