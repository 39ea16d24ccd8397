#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear
#![allow(clippy::cast_precision_loss)] // Counters are reported as f64 gauge values

//! # Worker StatsD
//!
//! Instrumentation middleware for background job processing.
//!
//! ## Overview
//!
//! [`ServerMiddleware`] wraps each job a worker executes and reports:
//!
//! - per-worker timing and success/failure counters (opt-in)
//! - framework-wide gauges: enqueued, retry set size, processed, failed
//! - per-queue gauges: jobs processing, their runtime, queue depth and latency
//!
//! All metrics for one job are buffered and sent to the metrics client in a
//! single batch once the job is done, whether it succeeded, failed or panicked.
//!
//! ## Collaborators
//!
//! The middleware owns neither the job queue nor the metrics transport. Both
//! are injected:
//!
//! - [`MetricsClient`] - receives each finished batch
//! - [`JobFramework`] - answers read-only stats queries
//!
//! ## Module Organization
//!
//! - [`middleware`] - the interceptor and its builder
//! - [`client`] - metrics client trait, batching scope and bundled clients
//! - [`framework`] - job framework stats capability
//! - [`context`] - job execution context
//! - [`metric_name`] - dotted metric name construction
//! - [`config`] - options and layered option loading
//! - [`error`] - error types
//! - [`logging`] - structured logging setup
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod framework;
pub mod logging;
pub mod metric_name;
pub mod middleware;

pub use client::{Batch, InMemoryMetricsClient, Metric, MetricsClient, TracingMetricsClient};
pub use config::{MiddlewareOptions, OptionsLoader};
pub use context::JobContext;
pub use error::{FrameworkError, MetricsError, MiddlewareError, Result};
pub use framework::{GlobalStats, JobFramework, QueueStats, RunningJob};
pub use metric_name::{worker_name, MetricName};
pub use middleware::{JobMiddleware, ServerMiddleware, ServerMiddlewareBuilder};
