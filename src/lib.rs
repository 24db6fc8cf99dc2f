//! traceparse - structured traceroute output with origin ASN enrichment
//!
//! This library turns the text printed by Unix `traceroute` into a
//! JSON-serializable [`TracerouteResult`] and fills in the origin AS of
//! each responder through Team Cymru's DNS whois mirror.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() {
//! let output = "traceroute to example.com (93.184.216.34), 30 hops max, 60 byte packets\n\
//!               1  192.0.2.1 (192.0.2.1)  1.234 ms  1.456 ms  1.789 ms\n";
//!
//! if let Some(result) = traceparse::parse_traceroute(output, true).await {
//!     println!("{}", serde_json::to_string(&result).unwrap());
//! }
//! # }
//! ```

pub mod asn;
pub mod dns;
pub mod traceroute;

// Re-export main types for library users
pub use asn::{AsnLookup, AsnLookupError, AsnSource};
pub use traceroute::{
    parse_traceroute, ConfigError, Hop, Outcome, ParseConfig, ParseConfigBuilder, ParseFailure,
    Probe, Rtt, TracerouteParser, TracerouteProcessor, TracerouteRecord, TracerouteResult,
};
