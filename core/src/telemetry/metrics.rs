use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Counters describing what happened to every delivered spoke and sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub spokes_received: u64,
    pub spokes_ignored: u64,
    pub spokes_skipped: u64,
    pub decode_errors: u64,
    pub sweeps_emitted: u64,
    pub publish_errors: u64,
}

pub struct PipelineMetrics {
    inner: Mutex<MetricsSnapshot>,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut MetricsSnapshot)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }

    pub fn record_received(&self) {
        self.update(|m| m.spokes_received += 1);
    }

    pub fn record_ignored(&self) {
        self.update(|m| m.spokes_ignored += 1);
    }

    pub fn record_skipped(&self, count: u64) {
        self.update(|m| m.spokes_skipped += count);
    }

    pub fn record_decode_error(&self) {
        self.update(|m| m.decode_errors += 1);
    }

    pub fn record_sweep(&self) {
        self.update(|m| m.sweeps_emitted += 1);
    }

    pub fn record_publish_error(&self) {
        self.update(|m| m.publish_errors += 1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().map(|m| *m).unwrap_or_default()
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = PipelineMetrics::new();
        metrics.record_received();
        metrics.record_received();
        metrics.record_skipped(3);
        metrics.record_decode_error();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.spokes_received, 2);
        assert_eq!(snapshot.spokes_skipped, 3);
        assert_eq!(snapshot.decode_errors, 1);
        assert_eq!(snapshot.sweeps_emitted, 0);
    }
}
