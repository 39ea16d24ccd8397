//! Mock Job Framework Implementation for Testing
//!
//! Provides a mock implementation of the JobFramework trait so the
//! middleware can be exercised without a real queue backend.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use worker_statsd::{FrameworkError, GlobalStats, JobFramework, QueueStats, RunningJob};

/// Query methods on the framework, for call tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameworkCall {
    GlobalStats,
    Queue(String),
    RunningWork,
}

/// Mock framework state for tracking calls and simulating behavior
#[derive(Debug, Default)]
struct MockFrameworkState {
    /// Every query made, in order
    pub calls: Vec<FrameworkCall>,
    /// Counters returned by global_stats
    pub global_stats: GlobalStats,
    /// Stats per queue; unknown queues report empty
    pub queues: HashMap<String, QueueStats>,
    /// Jobs returned by running_work
    pub running: Vec<RunningJob>,
    /// Queries that should fail
    pub failing: Vec<FrameworkCall>,
}

/// Mock framework implementation for testing
#[derive(Debug, Default)]
pub struct MockJobFramework {
    state: Mutex<MockFrameworkState>,
}

impl MockJobFramework {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global_stats(self, stats: GlobalStats) -> Self {
        self.state.lock().global_stats = stats;
        self
    }

    pub fn with_queue(self, name: &str, size: u64, latency_seconds: f64) -> Self {
        self.state.lock().queues.insert(
            name.to_string(),
            QueueStats {
                size,
                latency_seconds,
            },
        );
        self
    }

    pub fn with_running(self, queue: &str, started_at: i64) -> Self {
        self.state
            .lock()
            .running
            .push(RunningJob::new(queue, started_at));
        self
    }

    /// Make every query of the given kind fail
    pub fn failing(self, call: FrameworkCall) -> Self {
        self.state.lock().failing.push(call);
        self
    }

    pub fn calls(&self) -> Vec<FrameworkCall> {
        self.state.lock().calls.clone()
    }

    pub fn was_called(&self, call: &FrameworkCall) -> bool {
        self.state.lock().calls.contains(call)
    }

    fn record(&self, call: FrameworkCall) -> Result<(), FrameworkError> {
        let mut state = self.state.lock();
        let fails = state.failing.iter().any(|failing| match (failing, &call) {
            (FrameworkCall::Queue(_), FrameworkCall::Queue(_)) => true,
            (failing, call) => failing == call,
        });
        state.calls.push(call.clone());

        if fails {
            Err(FrameworkError::query_failed(
                format!("{call:?}"),
                "simulated failure",
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl JobFramework for MockJobFramework {
    async fn global_stats(&self) -> Result<GlobalStats, FrameworkError> {
        self.record(FrameworkCall::GlobalStats)?;
        Ok(self.state.lock().global_stats)
    }

    async fn queue(&self, name: &str) -> Result<QueueStats, FrameworkError> {
        self.record(FrameworkCall::Queue(name.to_string()))?;
        Ok(self
            .state
            .lock()
            .queues
            .get(name)
            .copied()
            .unwrap_or_default())
    }

    async fn running_work(&self) -> Result<Vec<RunningJob>, FrameworkError> {
        self.record(FrameworkCall::RunningWork)?;
        Ok(self.state.lock().running.clone())
    }
}
