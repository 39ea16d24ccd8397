//! Metrics client that writes each flushed batch as a structured log event.
//!
//! No collector is contacted; this is the sink to use in development or when
//! metrics should end up in the log pipeline.

use tracing::{event, Level};

use super::{Metric, MetricsClient};
use crate::error::MetricsError;

#[derive(Debug, Clone)]
pub struct TracingMetricsClient {
    level: Level,
}

impl TracingMetricsClient {
    pub fn new() -> Self {
        Self { level: Level::INFO }
    }

    pub fn with_level(level: Level) -> Self {
        Self { level }
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for TracingMetricsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsClient for TracingMetricsClient {
    fn send(&self, metrics: &[Metric]) -> Result<(), MetricsError> {
        let lines = metrics
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");

        // `event!` needs a constant level
        let metric_count = metrics.len();
        if self.level == Level::ERROR {
            event!(Level::ERROR, metric_count, payload = %lines, "📊 METRICS_BATCH");
        } else if self.level == Level::WARN {
            event!(Level::WARN, metric_count, payload = %lines, "📊 METRICS_BATCH");
        } else if self.level == Level::INFO {
            event!(Level::INFO, metric_count, payload = %lines, "📊 METRICS_BATCH");
        } else if self.level == Level::DEBUG {
            event!(Level::DEBUG, metric_count, payload = %lines, "📊 METRICS_BATCH");
        } else {
            event!(Level::TRACE, metric_count, payload = %lines, "📊 METRICS_BATCH");
        }

        Ok(())
    }

    fn client_name(&self) -> &'static str {
        "tracing"
    }
}
