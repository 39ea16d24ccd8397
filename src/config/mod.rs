//! # Middleware Configuration
//!
//! Typed, immutable options for the metrics middleware. Options are resolved
//! once, before the middleware is built, and never change afterwards.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use worker_statsd::config::{MiddlewareOptions, OptionsLoader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Defaults: prefix "sidekiq", global stats on, worker stats off
//! let defaults = MiddlewareOptions::default();
//!
//! // Layered: config file, environment override file, WORKER_STATSD_* variables
//! let options = OptionsLoader::new().with_directory("config").load()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::OptionsLoader;

use serde::{Deserialize, Serialize};

use crate::metric_name::METRIC_DELIMITER;

/// Default metric name prefix
pub const DEFAULT_PREFIX: &str = "sidekiq";

/// Options recognised by the metrics middleware
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MiddlewareOptions {
    /// Prefix for every metric name (e.g. `prefix.worker_name.success`)
    pub prefix: String,

    /// Report framework-wide gauges (enqueued, retries, processed, failed)
    /// and per-queue processing gauges
    #[serde(alias = "sidekiq_stats")]
    pub report_global_stats: bool,

    /// Report per-worker timing and success/failure counters
    #[serde(alias = "worker_stats")]
    pub report_worker_stats: bool,
}

impl Default for MiddlewareOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            report_global_stats: true,
            report_worker_stats: false,
        }
    }
}

impl MiddlewareOptions {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_global_stats(mut self, enabled: bool) -> Self {
        self.report_global_stats = enabled;
        self
    }

    pub fn with_worker_stats(mut self, enabled: bool) -> Self {
        self.report_worker_stats = enabled;
        self
    }

    /// Reject prefixes that would produce malformed metric names.
    ///
    /// Applied to file and environment sourced options by
    /// [`OptionsLoader::load`]; options handed straight to the builder are
    /// used as given.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.prefix.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "prefix",
                "middleware options",
            ));
        }

        if self.prefix.split(METRIC_DELIMITER).any(|part| part.trim().is_empty()) {
            return Err(ConfigurationError::invalid_value(
                "prefix",
                self.prefix.clone(),
                "prefix must not contain empty dotted components",
            ));
        }

        Ok(())
    }
}
