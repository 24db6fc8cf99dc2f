//! Result types for parsed traceroute output

use crate::traceroute::types::Hop;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Structured form of one traceroute output.
///
/// Serializes with the field names and order `target`, `target_ip`,
/// `hops_max`, `pkt_size`, `hops`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracerouteResult {
    /// Target as given to traceroute
    pub target: String,
    /// Resolved target address, when the header printed one
    pub target_ip: Option<String>,
    /// Maximum hop count requested
    pub hops_max: u32,
    /// Probe packet size in bytes
    pub pkt_size: u32,
    /// Hops in the order they appear in the output
    pub hops: Vec<Hop>,
}

impl TracerouteResult {
    /// Get the number of hop lines parsed
    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    /// Get the last hop that produced at least one RTT
    pub fn last_responding_hop(&self) -> Option<&Hop> {
        self.hops.iter().rev().find(|h| !h.is_silent())
    }
}

/// Why a traceroute output produced no result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    /// The command printed nothing
    NoOutput,
    /// The header line was not recognised
    Unparseable,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::NoOutput => write!(f, "no traceroute output"),
            ParseFailure::Unparseable => write!(f, "could not parse traceroute"),
        }
    }
}

/// Parsed result or the error marker written in its place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    /// Output was parsed
    Parsed(TracerouteResult),
    /// Output could not be parsed
    Failed {
        /// Human readable reason
        error: String,
    },
}

impl From<ParseFailure> for Outcome {
    fn from(failure: ParseFailure) -> Self {
        Outcome::Failed {
            error: failure.to_string(),
        }
    }
}

/// A traceroute result as stored alongside the other measurements.
///
/// The parse outcome is flattened into the record, followed by the
/// invocation's wall-clock bounds (seconds since the UNIX epoch) and the
/// raw command output.
///
/// # Examples
///
/// ```
/// use std::time::SystemTime;
/// use traceparse::{TracerouteParser, TracerouteRecord};
///
/// let raw = b"traceroute to a (1.1.1.1), 30 hops max, 60 byte packets\n 1  * * *\n";
/// let start = SystemTime::now();
/// let parsed = TracerouteParser::new().parse_offline(&String::from_utf8_lossy(raw));
/// let record = TracerouteRecord::new(raw, parsed, start, SystemTime::now());
///
/// assert!(record.result().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracerouteRecord {
    /// Parse outcome
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Invocation start, seconds since the UNIX epoch
    pub time_start: f64,
    /// Invocation end, seconds since the UNIX epoch
    pub time_end: f64,
    /// Command output, invalid UTF-8 replaced
    pub raw: String,
}

impl TracerouteRecord {
    /// Compose a record from captured output and its parse result.
    ///
    /// `parsed == None` becomes an error marker: "no traceroute output" for
    /// blank output, "could not parse traceroute" otherwise.
    pub fn new(
        raw: &[u8],
        parsed: Option<TracerouteResult>,
        time_start: SystemTime,
        time_end: SystemTime,
    ) -> Self {
        let raw = String::from_utf8_lossy(raw).into_owned();
        let outcome = match parsed {
            Some(result) => Outcome::Parsed(result),
            None if raw.trim().is_empty() => ParseFailure::NoOutput.into(),
            None => ParseFailure::Unparseable.into(),
        };
        Self {
            outcome,
            time_start: epoch_secs(time_start),
            time_end: epoch_secs(time_end),
            raw,
        }
    }

    /// Get the parsed result, if any
    pub fn result(&self) -> Option<&TracerouteResult> {
        match &self.outcome {
            Outcome::Parsed(result) => Some(result),
            Outcome::Failed { .. } => None,
        }
    }

    /// Get the error marker, if parsing failed
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Parsed(_) => None,
            Outcome::Failed { error } => Some(error),
        }
    }
}

fn epoch_secs(time: SystemTime) -> f64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}
