//! In-memory metrics client.
//!
//! Keeps every flushed batch so applications can assert on emitted metrics in
//! their own tests without a collector running.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{Metric, MetricsClient};
use crate::error::MetricsError;

#[derive(Debug, Default)]
pub struct InMemoryMetricsClient {
    batches: Mutex<Vec<Vec<Metric>>>,
    fail_sends: AtomicBool,
}

impl InMemoryMetricsClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail, to exercise error paths
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Every batch received, in order
    pub fn batches(&self) -> Vec<Vec<Metric>> {
        self.batches.lock().clone()
    }

    /// All metrics received, flattened across batches
    pub fn metrics(&self) -> Vec<Metric> {
        self.batches.lock().iter().flatten().cloned().collect()
    }

    /// Number of successful sends
    pub fn flush_count(&self) -> usize {
        self.batches.lock().len()
    }
}

impl MetricsClient for InMemoryMetricsClient {
    fn send(&self, metrics: &[Metric]) -> Result<(), MetricsError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(MetricsError::SendFailed {
                count: metrics.len(),
                message: "in-memory client configured to fail".to_string(),
            });
        }

        self.batches.lock().push(metrics.to_vec());
        Ok(())
    }

    fn client_name(&self) -> &'static str {
        "in_memory"
    }
}
