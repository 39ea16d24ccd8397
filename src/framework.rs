//! # Job Framework Capability
//!
//! Read-only view of the host job framework's shared state. The middleware
//! never looks this up globally; an implementation is injected at
//! construction so tests can substitute fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::FrameworkError;

/// Framework-wide counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    /// Jobs waiting across all queues
    pub enqueued: u64,
    /// Jobs scheduled for retry
    pub retry_set_size: u64,
    /// All-time processed count
    pub processed: u64,
    /// All-time failed count
    pub failed: u64,
}

/// State of a single queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Current depth
    pub size: u64,
    /// Seconds the oldest enqueued job has been waiting
    pub latency_seconds: f64,
}

/// A job currently being executed by some worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningJob {
    pub queue: String,
    /// Start time, Unix epoch seconds
    pub started_at: i64,
}

impl RunningJob {
    pub fn new(queue: impl Into<String>, started_at: i64) -> Self {
        Self {
            queue: queue.into(),
            started_at,
        }
    }

    /// Whole seconds this job has been running at `now` (epoch seconds)
    pub fn runtime_seconds(&self, now: i64) -> i64 {
        now - self.started_at
    }
}

/// Queries the middleware runs against the host job framework
#[async_trait]
pub trait JobFramework: Send + Sync {
    /// Snapshot of the global counters
    async fn global_stats(&self) -> Result<GlobalStats, FrameworkError>;

    /// Size and latency of the named queue
    async fn queue(&self, name: &str) -> Result<QueueStats, FrameworkError>;

    /// Jobs currently executing across all workers
    async fn running_work(&self) -> Result<Vec<RunningJob>, FrameworkError>;
}
