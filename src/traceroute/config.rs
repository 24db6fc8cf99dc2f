//! Configuration for turning traceroute output into records

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Error returned when a configuration is invalid
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A zero overall timeout would never let a parse finish
    #[error("overall_timeout must be greater than 0")]
    ZeroTimeout,
}

/// Configuration for processing traceroute output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseConfig {
    /// Enable origin ASN lookups (default: true)
    pub enable_asn_lookup: bool,
    /// Upper bound for parsing including all lookups (default: none)
    pub overall_timeout: Option<Duration>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            enable_asn_lookup: true,
            overall_timeout: None,
        }
    }
}

impl ParseConfig {
    /// Create a new ParseConfig builder
    pub fn builder() -> ParseConfigBuilder {
        ParseConfigBuilder::new()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.overall_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Builder for ParseConfig
pub struct ParseConfigBuilder {
    config: ParseConfig,
}

impl ParseConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: ParseConfig::default(),
        }
    }

    /// Enable or disable ASN lookups
    pub fn enable_asn_lookup(mut self, enable: bool) -> Self {
        self.config.enable_asn_lookup = enable;
        self
    }

    /// Set the overall timeout
    pub fn overall_timeout(mut self, timeout: Duration) -> Self {
        self.config.overall_timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ParseConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ParseConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
