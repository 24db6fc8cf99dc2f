//! ASN lookup service
//!
//! This module provides the service-oriented API the traceroute parser
//! uses to enrich responder addresses with their origin AS number.

use super::lookup::{lookup_origin_asn, AsnLookupError, ORIGIN_ASN_PATTERN};
use crate::dns::{SystemTxtLookup, TxtLookup};
use async_trait::async_trait;
use regex::Regex;

/// Source of origin AS numbers for responder addresses.
///
/// Implementations are best-effort: any failure is reported as `None` and
/// never propagates to the caller.
#[async_trait]
pub trait AsnSource: Send + Sync {
    /// Return the bare origin AS number of `ip` (e.g. `"15169"`)
    async fn origin_asn(&self, ip: &str) -> Option<String>;
}

/// Origin ASN lookup service backed by Team Cymru's DNS mirror.
///
/// Every call performs at most one TXT query. Nothing is cached and no
/// query is retried.
///
/// # Examples
///
/// ```no_run
/// use traceparse::asn::{AsnLookup, AsnSource};
///
/// #[tokio::main]
/// async fn main() {
///     let asn_service = AsnLookup::new();
///
///     if let Some(asn) = asn_service.origin_asn("8.8.8.8").await {
///         println!("AS{asn}");
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AsnLookup<Q = SystemTxtLookup> {
    txt: Q,
    pattern: Regex,
}

impl AsnLookup<SystemTxtLookup> {
    /// Create a lookup service using the system resolver configuration
    pub fn new() -> Self {
        Self::with_txt_lookup(SystemTxtLookup::new())
    }
}

impl<Q: TxtLookup> AsnLookup<Q> {
    /// Create a lookup service with a specific TXT query implementation
    pub fn with_txt_lookup(txt: Q) -> Self {
        Self {
            txt,
            pattern: Regex::new(ORIGIN_ASN_PATTERN).expect("origin ASN pattern is valid"),
        }
    }

    /// Look up the origin AS number of an address
    ///
    /// Unlike [`AsnSource::origin_asn`], the reason for a failed lookup is
    /// returned to the caller.
    pub async fn lookup(&self, ip: &str) -> Result<String, AsnLookupError> {
        lookup_origin_asn(ip, &self.txt, &self.pattern).await
    }

    /// Access the underlying TXT query implementation
    pub fn txt_lookup(&self) -> &Q {
        &self.txt
    }
}

impl Default for AsnLookup<SystemTxtLookup> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<Q: TxtLookup> AsnSource for AsnLookup<Q> {
    async fn origin_asn(&self, ip: &str) -> Option<String> {
        match self.lookup(ip).await {
            Ok(asn) => Some(asn),
            Err(e) => {
                log::debug!("origin ASN lookup for {ip} failed: {e}");
                None
            }
        }
    }
}
