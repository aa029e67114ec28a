pub mod log;
pub mod metrics;

pub use self::log::log_outcome;
pub use metrics::{CallMetrics, MetricsSnapshot};
