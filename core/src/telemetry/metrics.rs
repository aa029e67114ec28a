use crate::prelude::ErrorKind;
use std::collections::HashMap;
use std::sync::Mutex;

/// Counters for remote-call outcomes.
pub struct CallMetrics {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub succeeded: usize,
    pub failed: HashMap<ErrorKind, usize>,
    pub stale_discarded: usize,
}

#[derive(Default)]
struct Metrics {
    succeeded: usize,
    failed: HashMap<ErrorKind, usize>,
    stale_discarded: usize,
}

impl CallMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_success(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.succeeded += 1;
        }
    }

    pub fn record_failure(&self, kind: ErrorKind) {
        if let Ok(mut metrics) = self.inner.lock() {
            *metrics.failed.entry(kind).or_insert(0) += 1;
        }
    }

    pub fn record_stale(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.stale_discarded += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                succeeded: metrics.succeeded,
                failed: metrics.failed.clone(),
                stale_discarded: metrics.stale_discarded,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for CallMetrics {
    fn default() -> Self {
        Self::new()
    }
}
