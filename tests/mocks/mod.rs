#![allow(dead_code)]

pub mod mock_framework;

pub use mock_framework::{FrameworkCall, MockJobFramework};

use std::sync::Arc;
use worker_statsd::{InMemoryMetricsClient, Metric, MiddlewareOptions, ServerMiddleware};

/// Middleware wired to an in-memory client and the given mock framework
pub fn middleware_with(
    options: MiddlewareOptions,
    framework: Arc<MockJobFramework>,
) -> (ServerMiddleware, Arc<InMemoryMetricsClient>) {
    let client = Arc::new(InMemoryMetricsClient::new());
    let middleware = ServerMiddleware::builder()
        .options(options)
        .metrics_client(client.clone())
        .framework(framework)
        .build()
        .expect("middleware should build with a client and framework");
    (middleware, client)
}

pub fn metric_names(metrics: &[Metric]) -> Vec<String> {
    metrics.iter().map(|m| m.name().to_string()).collect()
}

/// Metrics with the given name
pub fn named<'a>(metrics: &'a [Metric], name: &str) -> Vec<&'a Metric> {
    metrics
        .iter()
        .filter(|m| m.name().as_str() == name)
        .collect()
}

pub fn gauge_value(metrics: &[Metric], name: &str) -> Option<f64> {
    metrics.iter().find_map(|m| match m {
        Metric::Gauge { name: n, value } if n.as_str() == name => Some(*value),
        _ => None,
    })
}
