//! # Server Middleware
//!
//! Wraps the execution of a job with metrics. Per-job timing and
//! success/failure counters are optional; queue gauges are always reported.
//! Every metric emitted during one invocation goes out in a single batch.
//!
//! ## Emitted metrics
//!
//! | Metric | Kind | When |
//! |--------|------|------|
//! | `prefix.<worker>.processing_time` | timing | worker stats |
//! | `prefix.<worker>.success` / `.failure` | counter | worker stats |
//! | `prefix.enqueued`, `.retry_set_size`, `.processed`, `.failed` | gauge | global stats |
//! | `prefix.queues.<queue>.processing` | gauge | global stats |
//! | `prefix.queues.<queue>.runtime` | gauge | global and worker stats |
//! | `prefix.queues.<queue>.enqueued`, `.latency` | gauge | always |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use worker_statsd::{JobContext, MiddlewareOptions, ServerMiddleware, TracingMetricsClient};
//! # use worker_statsd::framework::JobFramework;
//!
//! # async fn example(framework: Arc<dyn JobFramework>) -> Result<(), Box<dyn std::error::Error>> {
//! let middleware = ServerMiddleware::builder()
//!     .options(MiddlewareOptions::default().with_worker_stats(true))
//!     .metrics_client(Arc::new(TracingMetricsClient::new()))
//!     .framework(framework)
//!     .build()?;
//!
//! let context = JobContext::new("Billing::InvoiceJob", "billing");
//! let total = middleware
//!     .intercept(&context, || async { Ok::<_, std::io::Error>(40 + 2) })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::Utc;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::BTreeMap;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::{Batch, MetricsClient};
use crate::config::MiddlewareOptions;
use crate::context::JobContext;
use crate::error::{MiddlewareError, Result};
use crate::framework::JobFramework;
use crate::logging::log_stats_query_failure;
use crate::metric_name::MetricName;

/// Boxed error type used at the middleware-chain seam
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Continuation passed to [`JobMiddleware::call`]: the rest of the chain, ending in the job body
pub type Next<'a> = BoxFuture<'a, std::result::Result<(), BoxError>>;

/// Seam for a host framework's server-side middleware chain
#[async_trait]
pub trait JobMiddleware: Send + Sync {
    async fn call<'a>(
        &self,
        context: &JobContext,
        next: Next<'a>,
    ) -> std::result::Result<(), BoxError>;
}

/// Metrics interceptor for job execution
#[derive(Clone)]
pub struct ServerMiddleware {
    options: MiddlewareOptions,
    metrics_client: Arc<dyn MetricsClient>,
    framework: Arc<dyn JobFramework>,
}

impl std::fmt::Debug for ServerMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerMiddleware")
            .field("options", &self.options)
            .field("metrics_client", &self.metrics_client.client_name())
            .finish_non_exhaustive()
    }
}

impl ServerMiddleware {
    pub fn builder() -> ServerMiddlewareBuilder {
        ServerMiddlewareBuilder::default()
    }

    pub fn options(&self) -> &MiddlewareOptions {
        &self.options
    }

    /// Run `work`, reporting metrics for it in one batch.
    ///
    /// The job's own error is returned unchanged. A panic, whether raised by
    /// `work` itself or by the future it returns, is resumed after the batch
    /// has been flushed. Failures while querying the
    /// job framework are logged and never affect the returned outcome.
    pub async fn intercept<F, Fut, T, E>(
        &self,
        context: &JobContext,
        work: F,
    ) -> std::result::Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let worker_name = context.worker_name();
        let mut batch = Batch::open(self.metrics_client.as_ref());

        let outcome = if self.options.report_worker_stats {
            let outcome = batch
                .time(
                    self.metric([Some(worker_name.as_str()), Some("processing_time")]),
                    AssertUnwindSafe(async move { work().await }).catch_unwind(),
                )
                .await;

            let status = match &outcome {
                Ok(Ok(_)) => "success",
                Ok(Err(_)) | Err(_) => "failure",
            };
            batch.increment(self.metric([Some(worker_name.as_str()), Some(status)]));
            debug!(worker = %worker_name, status, "Job finished");
            outcome
        } else {
            AssertUnwindSafe(async move { work().await }).catch_unwind().await
        };

        self.report_stats(&mut batch, context).await;

        if let Err(e) = batch.flush() {
            warn!(worker = %worker_name, error = %e, "Failed to flush job metrics");
        }

        match outcome {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Gauges reported after every job, whatever its outcome
    async fn report_stats(&self, batch: &mut Batch<'_>, context: &JobContext) {
        if self.options.report_global_stats {
            self.report_global_stats(batch).await;
            self.report_worker_stats(batch).await;
        }
        self.report_queue_stats(batch, context.message_queue()).await;
    }

    async fn report_global_stats(&self, batch: &mut Batch<'_>) {
        let stats = match self.framework.global_stats().await {
            Ok(stats) => stats,
            Err(e) => {
                log_stats_query_failure("global_stats", &self.metric([]), &e);
                return;
            }
        };

        // Queue sizes
        batch.gauge(self.metric([Some("enqueued")]), stats.enqueued as f64);
        batch.gauge(self.metric([Some("retry_set_size")]), stats.retry_set_size as f64);

        // All-time counts
        batch.gauge(self.metric([Some("processed")]), stats.processed as f64);
        batch.gauge(self.metric([Some("failed")]), stats.failed as f64);
    }

    async fn report_worker_stats(&self, batch: &mut Batch<'_>) {
        let running = match self.framework.running_work().await {
            Ok(running) => running,
            Err(e) => {
                log_stats_query_failure("running_work", &self.metric([Some("queues")]), &e);
                return;
            }
        };

        if self.options.report_worker_stats {
            let now = Utc::now().timestamp();
            for job in &running {
                batch.gauge(
                    self.metric([Some("queues"), Some(job.queue.as_str()), Some("runtime")]),
                    job.runtime_seconds(now) as f64,
                );
            }
        }

        let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
        for job in &running {
            *groups.entry(job.queue.as_str()).or_default() += 1;
        }

        for (queue, processing) in groups {
            batch.gauge(
                self.metric([Some("queues"), Some(queue), Some("processing")]),
                processing as f64,
            );
        }
    }

    async fn report_queue_stats(&self, batch: &mut Batch<'_>, queue: &str) {
        let base = self.metric([Some("queues"), Some(queue)]);
        let stats = match self.framework.queue(queue).await {
            Ok(stats) => stats,
            Err(e) => {
                log_stats_query_failure("queue", &base, &e);
                return;
            }
        };

        batch.gauge(base.child("enqueued"), stats.size as f64);
        batch.gauge(base.child("latency"), stats.latency_seconds);
    }

    /// Metric name under the configured prefix
    fn metric<'a, const N: usize>(&'a self, segments: [Option<&'a str>; N]) -> MetricName {
        MetricName::join(std::iter::once(Some(self.options.prefix.as_str())).chain(segments))
    }
}

#[async_trait]
impl JobMiddleware for ServerMiddleware {
    async fn call<'a>(
        &self,
        context: &JobContext,
        next: Next<'a>,
    ) -> std::result::Result<(), BoxError> {
        self.intercept(context, || next).await
    }
}

/// Builder for [`ServerMiddleware`]
#[derive(Default)]
pub struct ServerMiddlewareBuilder {
    options: Option<MiddlewareOptions>,
    metrics_client: Option<Arc<dyn MetricsClient>>,
    framework: Option<Arc<dyn JobFramework>>,
}

impl ServerMiddlewareBuilder {
    pub fn options(mut self, options: MiddlewareOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn metrics_client(mut self, client: Arc<dyn MetricsClient>) -> Self {
        self.metrics_client = Some(client);
        self
    }

    pub fn framework(mut self, framework: Arc<dyn JobFramework>) -> Self {
        self.framework = Some(framework);
        self
    }

    /// Fails if no metrics client or job framework was supplied. Options are
    /// taken as given; names built from them skip empty components.
    pub fn build(self) -> Result<ServerMiddleware> {
        let metrics_client = self.metrics_client.ok_or_else(|| {
            MiddlewareError::Configuration("A metrics client must be provided".to_string())
        })?;
        let framework = self.framework.ok_or_else(|| {
            MiddlewareError::Configuration("A job framework must be provided".to_string())
        })?;
        let options = self.options.unwrap_or_default();

        debug!(
            prefix = %options.prefix,
            report_global_stats = options.report_global_stats,
            report_worker_stats = options.report_worker_stats,
            client = metrics_client.client_name(),
            "🔧 Metrics middleware initialized"
        );

        Ok(ServerMiddleware {
            options,
            metrics_client,
            framework,
        })
    }
}
