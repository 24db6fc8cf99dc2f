//! High-level parsing API

use crate::asn::{AsnLookup, AsnSource};
use crate::traceroute::{ParseConfig, TracerouteParser, TracerouteRecord, TracerouteResult};
use std::time::SystemTime;

/// Traceroute output processor.
///
/// Combines a [`TracerouteParser`] with an ASN source and a [`ParseConfig`].
/// This is the entry point for callers that capture traceroute output and
/// want a [`TracerouteRecord`] back.
///
/// # Examples
///
/// ```no_run
/// use std::time::SystemTime;
/// use traceparse::{ParseConfig, TracerouteProcessor};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ParseConfig::builder()
///     .overall_timeout(std::time::Duration::from_secs(20))
///     .build()?;
/// let processor = TracerouteProcessor::new(config);
///
/// let time_start = SystemTime::now();
/// let output = std::process::Command::new("traceroute")
///     .args(["-A", "example.com"])
///     .output()?;
/// let time_end = SystemTime::now();
///
/// let record = processor.record(&output.stdout, time_start, time_end).await;
/// println!("{}", serde_json::to_string(&record)?);
/// # Ok(())
/// # }
/// ```
pub struct TracerouteProcessor {
    parser: TracerouteParser,
    config: ParseConfig,
    source: Box<dyn AsnSource>,
}

impl TracerouteProcessor {
    /// Create a processor resolving ASNs through the system resolver
    pub fn new(config: ParseConfig) -> Self {
        Self::with_source(config, Box::new(AsnLookup::new()))
    }

    /// Create a processor with a custom ASN source
    ///
    /// Useful for testing or when ASNs come from somewhere other than DNS.
    pub fn with_source(config: ParseConfig, source: Box<dyn AsnSource>) -> Self {
        Self {
            parser: TracerouteParser::new(),
            config,
            source,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Parse traceroute output according to the configuration.
    ///
    /// If the overall timeout elapses while lookups are still running, the
    /// output is parsed again without ASN lookups.
    pub async fn parse(&self, data: &str) -> Option<TracerouteResult> {
        if !self.config.enable_asn_lookup {
            return self.parser.parse_offline(data);
        }

        let enriched = self.parser.parse(data, Some(self.source.as_ref()));
        match self.config.overall_timeout {
            None => enriched.await,
            Some(limit) => match tokio::time::timeout(limit, enriched).await {
                Ok(result) => result,
                Err(_) => {
                    log::warn!(
                        "ASN enrichment did not finish within {limit:?}, keeping unenriched result"
                    );
                    self.parser.parse_offline(data)
                }
            },
        }
    }

    /// Parse captured output and compose the stored record
    pub async fn record(
        &self,
        raw: &[u8],
        time_start: SystemTime,
        time_end: SystemTime,
    ) -> TracerouteRecord {
        let data = String::from_utf8_lossy(raw);
        let parsed = self.parse(&data).await;
        TracerouteRecord::new(raw, parsed, time_start, time_end)
    }
}

/// Parse traceroute output with the default ASN lookup
///
/// # Arguments
///
/// * `data` - Raw traceroute output
/// * `enable_asn_lookup` - Whether to look up origin ASNs for responders
///
/// # Returns
///
/// `None` if the header line is not recognised.
pub async fn parse_traceroute(data: &str, enable_asn_lookup: bool) -> Option<TracerouteResult> {
    let parser = TracerouteParser::new();
    if enable_asn_lookup {
        parser.parse(data, Some(&AsnLookup::new())).await
    } else {
        parser.parse_offline(data)
    }
}
