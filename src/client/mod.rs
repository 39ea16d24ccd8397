//! # Metrics Client
//!
//! The metrics client is an external capability: the middleware only needs a
//! way to hand over a finished batch of metrics as one outbound operation.
//! Buffering, timing and the flush-on-exit guarantee live in [`Batch`].
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use worker_statsd::client::{Batch, InMemoryMetricsClient};
//! use worker_statsd::MetricName;
//!
//! let client = Arc::new(InMemoryMetricsClient::new());
//! {
//!     let mut batch = Batch::open(client.as_ref());
//!     batch.increment(MetricName::join([Some("sidekiq"), Some("MyJob"), Some("success")]));
//!     batch.gauge(MetricName::join([Some("sidekiq"), Some("enqueued")]), 12.0);
//! } // flushed here
//!
//! assert_eq!(client.flush_count(), 1);
//! assert_eq!(client.metrics().len(), 2);
//! ```

pub mod batch;
pub mod memory;
pub mod tracing_client;

pub use batch::Batch;
pub use memory::InMemoryMetricsClient;
pub use tracing_client::TracingMetricsClient;

use crate::error::MetricsError;
use crate::metric_name::MetricName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A single metric emission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Metric {
    /// Point-in-time value, overwritten on each report
    Gauge { name: MetricName, value: f64 },
    /// Accumulating counter
    Counter { name: MetricName, delta: i64 },
    /// Duration of a single bounded operation
    Timing { name: MetricName, duration: Duration },
}

impl Metric {
    pub fn name(&self) -> &MetricName {
        match self {
            Metric::Gauge { name, .. } | Metric::Counter { name, .. } | Metric::Timing { name, .. } => {
                name
            }
        }
    }

    pub fn is_gauge(&self) -> bool {
        matches!(self, Metric::Gauge { .. })
    }

    pub fn is_counter(&self) -> bool {
        matches!(self, Metric::Counter { .. })
    }

    pub fn is_timing(&self) -> bool {
        matches!(self, Metric::Timing { .. })
    }
}

/// Statsd line form, used when metrics are written to logs
impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Gauge { name, value } => write!(f, "{name}:{value}|g"),
            Metric::Counter { name, delta } => write!(f, "{name}:{delta}|c"),
            Metric::Timing { name, duration } => write!(f, "{name}:{}|ms", duration.as_millis()),
        }
    }
}

/// Outbound side of a metrics collector.
///
/// Implementations must tolerate concurrent calls from many job invocations;
/// each call carries one complete batch.
pub trait MetricsClient: Send + Sync {
    /// Send a batch of metrics as a single outbound operation
    fn send(&self, metrics: &[Metric]) -> Result<(), MetricsError>;

    /// Name used in log output
    fn client_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_statsd_lines() {
        let name = MetricName::join([Some("sidekiq"), Some("enqueued")]);
        let gauge = Metric::Gauge {
            name: name.clone(),
            value: 42.0,
        };
        assert_eq!(gauge.to_string(), "sidekiq.enqueued:42|g");

        let counter = Metric::Counter {
            name: name.child("success"),
            delta: 1,
        };
        assert_eq!(counter.to_string(), "sidekiq.enqueued.success:1|c");

        let timing = Metric::Timing {
            name: name.child("processing_time"),
            duration: Duration::from_millis(250),
        };
        assert_eq!(timing.to_string(), "sidekiq.enqueued.processing_time:250|ms");
    }

    #[test]
    fn test_metric_kind_helpers() {
        let gauge = Metric::Gauge {
            name: MetricName::join([Some("a")]),
            value: 1.5,
        };
        assert!(gauge.is_gauge());
        assert!(!gauge.is_counter());
        assert!(!gauge.is_timing());
        assert_eq!(gauge.name(), &"a");
    }
}
