//! TXT record queries

use async_trait::async_trait;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::system_conf::read_system_conf;
use hickory_resolver::TokioResolver;

/// Error type for TXT lookups
#[derive(Debug, thiserror::Error)]
pub enum TxtLookupError {
    /// The system resolver configuration could not be loaded
    #[error("Failed to load resolver configuration: {0}")]
    Config(String),

    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    Resolution(String),
}

/// A DNS TXT query primitive.
///
/// Each returned record is the list of its character-string segments,
/// decoded lossily as UTF-8.
#[async_trait]
pub trait TxtLookup: Send + Sync {
    /// Query the TXT records of a fully qualified name
    async fn txt(&self, name: &str) -> Result<Vec<Vec<String>>, TxtLookupError>;
}

/// TXT lookups through the operating system's resolver configuration.
///
/// A fresh resolver is built for every query, so nothing (connections or
/// answers) is shared between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTxtLookup;

impl SystemTxtLookup {
    /// Create a new system TXT lookup
    pub fn new() -> Self {
        Self
    }

    fn resolver() -> Result<TokioResolver, TxtLookupError> {
        let (config, options) =
            read_system_conf().map_err(|e| TxtLookupError::Config(e.to_string()))?;
        Ok(
            TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
                .with_options(options)
                .build(),
        )
    }
}

#[async_trait]
impl TxtLookup for SystemTxtLookup {
    async fn txt(&self, name: &str) -> Result<Vec<Vec<String>>, TxtLookupError> {
        let resolver = Self::resolver()?;
        let lookup = resolver
            .txt_lookup(name)
            .await
            .map_err(|e| TxtLookupError::Resolution(e.to_string()))?;

        Ok(lookup
            .iter()
            .map(|record| {
                record
                    .iter()
                    .map(|data| String::from_utf8_lossy(data).into_owned())
                    .collect()
            })
            .collect())
    }
}
