//! Core types for parsed traceroute hops

use serde::{Deserialize, Serialize};
use std::fmt;

/// Round-trip time of a probe.
///
/// Numeric values are milliseconds. Text that looked like an RTT but did not
/// parse as a number is kept verbatim instead of failing the whole parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rtt {
    /// Round-trip time in milliseconds
    Millis(f64),
    /// Unparseable RTT text as printed by traceroute
    Raw(String),
}

impl Rtt {
    /// Parse the RTT text of a probe
    pub fn parse(text: &str) -> Self {
        text.parse::<f64>()
            .map(Rtt::Millis)
            .unwrap_or_else(|_| Rtt::Raw(text.to_string()))
    }

    /// Get the RTT in milliseconds, if it was numeric
    pub fn as_millis(&self) -> Option<f64> {
        match self {
            Rtt::Millis(ms) => Some(*ms),
            Rtt::Raw(_) => None,
        }
    }
}

impl fmt::Display for Rtt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rtt::Millis(ms) => write!(f, "{ms:.3} ms"),
            Rtt::Raw(raw) => write!(f, "{raw} ms"),
        }
    }
}

/// One probe packet reported for a hop.
///
/// `name`, `ip` and `asn` are inherited from earlier probes on the same hop
/// line when traceroute does not repeat them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Probe {
    /// Reverse-resolved hostname of the responder
    pub name: Option<String>,
    /// Numeric address of the responder
    pub ip: Option<String>,
    /// Origin AS of the responder, e.g. `"AS15169"`
    pub asn: Option<String>,
    /// Round-trip time, absent when the probe timed out
    pub rtt: Option<Rtt>,
    /// Trailing marker such as `!H` or `!X`
    pub annotation: Option<String>,
}

impl Probe {
    /// Check if this probe timed out
    pub fn is_timeout(&self) -> bool {
        self.rtt.is_none()
    }
}

/// One hop line of traceroute output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hop {
    /// Hop index as printed
    pub hop: u32,
    /// Probes in the order they appear on the line
    pub probes: Vec<Probe>,
}

impl Hop {
    /// Check if every probe of this hop timed out
    pub fn is_silent(&self) -> bool {
        self.probes.iter().all(Probe::is_timeout)
    }

    /// Get the RTTs of this hop in milliseconds, skipping timeouts
    pub fn rtts_ms(&self) -> Vec<f64> {
        self.probes
            .iter()
            .filter_map(|p| p.rtt.as_ref().and_then(Rtt::as_millis))
            .collect()
    }
}
