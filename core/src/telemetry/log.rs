use crate::prelude::{ErrorKind, FireResult};
use crate::telemetry::metrics::CallMetrics;
use log::{error, info, warn};

/// Logs and counts the outcome of one remote call.
///
/// User-caused failures (validation, authentication, not-found) are
/// warnings; network and storage failures are errors.
pub fn log_outcome<T>(metrics: &CallMetrics, call: &str, result: &FireResult<T>) {
    match result {
        Ok(_) => {
            metrics.record_success();
            info!("{} succeeded", call);
        }
        Err(err) => {
            metrics.record_failure(err.kind());
            match err.kind() {
                ErrorKind::Network | ErrorKind::Storage => error!("{} failed: {}", call, err),
                _ => warn!("{} failed: {}", call, err),
            }
        }
    }
}
