//! # Batched Emission Scope
//!
//! A [`Batch`] buffers every metric emitted during one job invocation and
//! hands them to the client in a single `send`. The flush happens exactly once:
//! either through [`Batch::flush`] or, if the scope is left any other way
//! (early return, panic, a dropped future), from `Drop`.

use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::{Metric, MetricsClient};
use crate::error::MetricsError;
use crate::metric_name::MetricName;

pub struct Batch<'a> {
    client: &'a dyn MetricsClient,
    buffer: Vec<Metric>,
    flushed: bool,
}

impl<'a> Batch<'a> {
    /// Open a buffering scope on the given client
    pub fn open(client: &'a dyn MetricsClient) -> Self {
        Self {
            client,
            buffer: Vec::new(),
            flushed: false,
        }
    }

    pub fn gauge(&mut self, name: MetricName, value: f64) {
        self.buffer.push(Metric::Gauge { name, value });
    }

    pub fn increment(&mut self, name: MetricName) {
        self.count(name, 1);
    }

    pub fn count(&mut self, name: MetricName, delta: i64) {
        self.buffer.push(Metric::Counter { name, delta });
    }

    pub fn timing(&mut self, name: MetricName, duration: Duration) {
        self.buffer.push(Metric::Timing { name, duration });
    }

    /// Await `operation` and record its wall-clock duration under `name`
    pub async fn time<F>(&mut self, name: MetricName, operation: F) -> F::Output
    where
        F: Future,
    {
        let started = Instant::now();
        let output = operation.await;
        self.timing(name, started.elapsed());
        output
    }

    /// Metrics buffered so far
    pub fn pending(&self) -> &[Metric] {
        &self.buffer
    }

    /// Send the buffered metrics and close the scope.
    ///
    /// An empty batch is not sent.
    pub fn flush(mut self) -> Result<(), MetricsError> {
        self.send_buffered()
    }

    fn send_buffered(&mut self) -> Result<(), MetricsError> {
        if self.flushed {
            return Ok(());
        }
        self.flushed = true;

        if self.buffer.is_empty() {
            return Ok(());
        }

        let metrics = std::mem::take(&mut self.buffer);
        debug!(
            client = self.client.client_name(),
            metric_count = metrics.len(),
            "Flushing metrics batch"
        );
        self.client.send(&metrics)
    }
}

impl Drop for Batch<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.send_buffered() {
            warn!(error = %e, "Metrics batch flush failed on scope exit");
        }
    }
}

impl std::fmt::Debug for Batch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Batch")
            .field("client", &self.client.client_name())
            .field("pending", &self.buffer.len())
            .field("flushed", &self.flushed)
            .finish()
    }
}
