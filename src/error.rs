//! # Error Types
//!
//! The middleware itself only ever fails at construction time. The other types
//! describe failures of its collaborators. Those are logged by the interceptor
//! and never replace the outcome of the job being observed.

use thiserror::Error;

use crate::config::ConfigurationError;

/// Errors raised by the middleware
#[derive(Debug, Error)]
pub enum MiddlewareError {
    /// Fatal, construction-time misconfiguration (e.g. no metrics client)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<ConfigurationError> for MiddlewareError {
    fn from(error: ConfigurationError) -> Self {
        MiddlewareError::Configuration(error.to_string())
    }
}

/// Failures reported by a [`JobFramework`](crate::framework::JobFramework) implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameworkError {
    /// The query reached the backing store but could not be answered
    #[error("Job framework query '{query}' failed: {message}")]
    QueryFailed { query: String, message: String },

    /// The backing store could not be reached at all
    #[error("Job framework unavailable: {0}")]
    Unavailable(String),
}

impl FrameworkError {
    pub fn query_failed(query: impl Into<String>, message: impl Into<String>) -> Self {
        FrameworkError::QueryFailed {
            query: query.into(),
            message: message.into(),
        }
    }
}

/// Failures reported by a [`MetricsClient`](crate::client::MetricsClient) implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("Failed to send {count} metrics: {message}")]
    SendFailed { count: usize, message: String },
}

pub type Result<T> = std::result::Result<T, MiddlewareError>;
