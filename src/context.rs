//! # Job Execution Context
//!
//! Identity of the job being run, the queue it was pulled from, and the raw
//! job message as handed over by the framework.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::metric_name::worker_name;

/// Message key holding the queue a job was enqueued on
pub const QUEUE_KEY: &str = "queue";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobContext {
    /// Worker type/class name, possibly namespaced with `::`
    pub worker_class: String,
    /// Queue the worker is processing
    pub queue: String,
    /// Opaque job payload
    pub message: Map<String, Value>,
}

impl JobContext {
    /// Build a context whose message names `queue`
    pub fn new(worker_class: impl Into<String>, queue: impl Into<String>) -> Self {
        let queue = queue.into();
        let mut message = Map::new();
        message.insert(QUEUE_KEY.to_string(), Value::String(queue.clone()));

        Self {
            worker_class: worker_class.into(),
            queue,
            message,
        }
    }

    /// Build a context for worker type `W`, using its Rust type path as identity
    pub fn for_worker<W: ?Sized>(queue: impl Into<String>) -> Self {
        Self::new(std::any::type_name::<W>(), queue)
    }

    /// Replace the message payload
    pub fn with_message(mut self, message: Map<String, Value>) -> Self {
        self.message = message;
        self
    }

    /// Metric-safe worker name (`Foo::Bar` -> `Foo.Bar`)
    pub fn worker_name(&self) -> String {
        worker_name(&self.worker_class)
    }

    /// Queue the message was enqueued on, falling back to the processing queue
    pub fn message_queue(&self) -> &str {
        self.message
            .get(QUEUE_KEY)
            .and_then(Value::as_str)
            .unwrap_or(&self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod billing {
        pub struct InvoiceJob;
    }

    #[test]
    fn test_worker_name_from_namespaced_class() {
        let context = JobContext::new("Foo::Bar", "default");
        assert_eq!(context.worker_name(), "Foo.Bar");
    }

    #[test]
    fn test_for_worker_uses_type_path() {
        let context = JobContext::for_worker::<billing::InvoiceJob>("billing");
        assert!(context.worker_class.ends_with("billing::InvoiceJob"));
        assert!(context.worker_name().ends_with("billing.InvoiceJob"));
        assert!(!context.worker_name().contains("::"));
    }

    #[test]
    fn test_message_queue_prefers_payload() {
        let message = json!({ "queue": "mailer", "args": [1, 2] });
        let context = JobContext::new("Foo", "default")
            .with_message(message.as_object().cloned().unwrap());
        assert_eq!(context.message_queue(), "mailer");
    }

    #[test]
    fn test_message_queue_falls_back_to_processing_queue() {
        let context = JobContext::new("Foo", "critical").with_message(Map::new());
        assert_eq!(context.message_queue(), "critical");
    }
}
