//! Options Loader
//!
//! Environment-aware loading of [`MiddlewareOptions`]. Sources are layered,
//! later ones overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. `<dir>/worker-statsd.{toml,yaml,json}`
//! 3. `<dir>/environments/<env>/worker-statsd.{toml,yaml,json}`
//! 4. `WORKER_STATSD_*` environment variables

use config::{Config, Environment, File};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::ConfigResult;
use super::MiddlewareOptions;

/// Base name of the configuration file, extension resolved by format
pub const CONFIG_FILE_STEM: &str = "worker-statsd";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "WORKER_STATSD";

#[derive(Debug, Clone)]
pub struct OptionsLoader {
    config_directory: Option<PathBuf>,
    environment: String,
    env_prefix: String,
}

impl Default for OptionsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionsLoader {
    /// Loader for the detected environment, reading environment variables only
    pub fn new() -> Self {
        Self {
            config_directory: None,
            environment: Self::detect_environment(),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Also read configuration files from `dir`
    pub fn with_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_directory = Some(dir.into());
        self
    }

    /// Use an explicit environment instead of the detected one.
    /// This is useful for testing without modifying global environment variables
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into().to_lowercase();
        self
    }

    /// Read overrides from `<prefix>_*` variables instead of `WORKER_STATSD_*`
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> Option<&Path> {
        self.config_directory.as_deref()
    }

    /// Resolve and validate options from all sources
    pub fn load(&self) -> ConfigResult<MiddlewareOptions> {
        let mut builder = Config::builder();

        if let Some(dir) = &self.config_directory {
            builder = builder
                .add_source(File::from(dir.join(CONFIG_FILE_STEM)).required(false))
                .add_source(
                    File::from(
                        dir.join("environments")
                            .join(&self.environment)
                            .join(CONFIG_FILE_STEM),
                    )
                    .required(false),
                );
        }

        builder = builder.add_source(Environment::with_prefix(&self.env_prefix).try_parsing(true));

        let options: MiddlewareOptions = builder.build()?.try_deserialize()?;
        options.validate()?;

        debug!(
            environment = %self.environment,
            prefix = %options.prefix,
            report_global_stats = options.report_global_stats,
            report_worker_stats = options.report_worker_stats,
            "Middleware options loaded"
        );

        Ok(options)
    }

    /// Detect the running environment from the usual variables
    pub fn detect_environment() -> String {
        env::var("WORKER_STATSD_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .or_else(|_| env::var("RAILS_ENV"))
            .or_else(|_| env::var("RACK_ENV"))
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
    }
}
