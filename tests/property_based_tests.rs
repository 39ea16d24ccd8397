mod common;
mod mocks;

use common::strategies::*;
use mocks::*;
use proptest::prelude::*;
use std::sync::Arc;
use worker_statsd::{worker_name, JobContext, MetricName, MiddlewareOptions};

proptest! {
    /// Property: joined names never contain empty components
    #[test]
    fn joined_names_have_no_empty_components(segments in prop::collection::vec(optional_segment_strategy(), 0..6)) {
        let name = MetricName::join(segments.iter().map(|s| s.as_deref()));
        if !name.is_empty() {
            prop_assert!(name.as_str().split('.').all(|part| !part.is_empty()), "bad name: {}", name);
        }
    }

    /// Property: joining keeps present segments in order
    #[test]
    fn joined_names_keep_segment_order(segments in prop::collection::vec(optional_segment_strategy(), 0..6)) {
        let name = MetricName::join(segments.iter().map(|s| s.as_deref()));
        let expected: Vec<&str> = segments
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect();
        prop_assert_eq!(name.as_str(), expected.join("."));
    }

    /// Property: worker names never contain the namespace delimiter
    #[test]
    fn worker_names_have_no_namespace_delimiter(class in worker_class_strategy()) {
        let name = worker_name(&class);
        prop_assert!(!name.contains("::"));
        prop_assert_eq!(name.split('.').count(), class.split("::").count());
    }

    /// Property: worker metrics follow prefix.worker.status for any worker and queue
    #[test]
    fn worker_metrics_follow_naming_contract(
        class in worker_class_strategy(),
        queue in queue_name_strategy(),
        fails in any::<bool>(),
    ) {
        let framework = Arc::new(MockJobFramework::new().with_queue(&queue, 1, 0.0));
        let (middleware, client) = middleware_with(
            MiddlewareOptions::default().with_worker_stats(true).with_global_stats(false),
            framework,
        );
        let context = JobContext::new(class.clone(), queue.clone());

        let result = tokio_test::block_on(middleware.intercept(&context, || async move {
            if fails { Err("failed") } else { Ok(()) }
        }));
        prop_assert_eq!(result.is_err(), fails);

        let worker = worker_name(&class);
        let status = if fails { "failure" } else { "success" };
        prop_assert_eq!(
            metric_names(&client.metrics()),
            vec![
                format!("sidekiq.{worker}.processing_time"),
                format!("sidekiq.{worker}.{status}"),
                format!("sidekiq.queues.{queue}.enqueued"),
                format!("sidekiq.queues.{queue}.latency"),
            ]
        );
        prop_assert_eq!(client.flush_count(), 1);
    }
}
