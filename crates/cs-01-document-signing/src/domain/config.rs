//! # Workflow Configuration
//!
//! Limits applied by the registry and the content store boundary.

use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Default maximum content size: 25 MiB.
pub const DEFAULT_MAX_CONTENT_BYTES: usize = 25 * 1024 * 1024;

/// Default bound on a single content store call.
pub const DEFAULT_CONTENT_STORE_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A zero content limit would reject every document.
    #[error("max_content_bytes must be greater than zero")]
    ZeroContentLimit,

    /// A zero timeout would fail every upload.
    #[error("content_store_timeout must be greater than zero")]
    ZeroTimeout,
}

/// Workflow configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Largest accepted content blob in bytes.
    pub max_content_bytes: usize,
    /// Bound on each content store call; expiry fails with a storage error.
    pub content_store_timeout: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
            content_store_timeout: DEFAULT_CONTENT_STORE_TIMEOUT,
        }
    }
}

impl WorkflowConfig {
    /// Create config for testing.
    pub fn for_testing() -> Self {
        Self {
            max_content_bytes: 64 * 1024,
            content_store_timeout: Duration::from_millis(200),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CS_MAX_CONTENT_BYTES`: Content size limit (default: 26214400)
    /// - `CS_CONTENT_STORE_TIMEOUT_MS`: Content store timeout (default: 30000)
    ///
    /// Unparseable values fall back to the default with a warning; so does
    /// a configuration that fails [`validate`](Self::validate).
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            max_content_bytes: read_env("CS_MAX_CONTENT_BYTES")
                .unwrap_or(defaults.max_content_bytes),
            content_store_timeout: read_env("CS_CONTENT_STORE_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.content_store_timeout),
        };

        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(error = %e, "Invalid workflow configuration, using defaults");
                defaults
            }
        }
    }

    /// Set the content size limit.
    pub fn with_max_content_bytes(mut self, bytes: usize) -> Self {
        self.max_content_bytes = bytes;
        self
    }

    /// Set the content store timeout.
    pub fn with_content_store_timeout(mut self, timeout: Duration) -> Self {
        self.content_store_timeout = timeout;
        self
    }

    /// Reject limits that would make the workflow unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_content_bytes == 0 {
            return Err(ConfigError::ZeroContentLimit);
        }
        if self.content_store_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable configuration value");
            None
        }
    }
}
