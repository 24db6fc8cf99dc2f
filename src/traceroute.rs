//! Traceroute output parsing

pub mod api;
pub mod config;
pub mod grammar;
pub mod parser;
pub mod result;
pub mod types;

// Re-export commonly used types
pub use api::{parse_traceroute, TracerouteProcessor};
pub use config::{ConfigError, ParseConfig, ParseConfigBuilder};
pub use grammar::Grammar;
pub use parser::TracerouteParser;
pub use result::{Outcome, ParseFailure, TracerouteRecord, TracerouteResult};
pub use types::{Hop, Probe, Rtt};
