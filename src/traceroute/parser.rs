//! Traceroute output parser

use crate::asn::AsnSource;
use crate::traceroute::grammar::{Grammar, ProbeToken};
use crate::traceroute::result::TracerouteResult;
use crate::traceroute::types::{Hop, Probe, Rtt};

/// Responder identity carried from probe to probe within one hop line.
///
/// Traceroute prints the name, address and AS of a responder only once and
/// elides them for further probes answered by the same router. A field is
/// replaced only when a probe prints a new value for it; timeout stars
/// leave it untouched.
#[derive(Debug, Default)]
struct StickyFields {
    name: Option<String>,
    ip: Option<String>,
    asn: Option<String>,
}

impl StickyFields {
    /// Apply the identity printed by `token`
    fn update(&mut self, token: &ProbeToken<'_>) {
        if let Some(name) = token.name {
            self.name = Some(name.to_string());
        }
        if let Some(ip) = token.ip {
            self.ip = Some(ip.to_string());
        }
        if let Some(asn) = token.asn {
            // `[*]` means the AS is unknown
            self.asn = (asn != "*").then(|| asn.to_string());
        }
    }

    /// Address that still needs an origin AS, if any
    fn needs_asn(&self) -> Option<&str> {
        match (&self.ip, &self.asn) {
            (Some(ip), None) => Some(ip),
            _ => None,
        }
    }

    fn probe(&self, token: &ProbeToken<'_>) -> Probe {
        Probe {
            name: self.name.clone(),
            ip: self.ip.clone(),
            asn: self.asn.clone(),
            rtt: token.rtt.map(Rtt::parse),
            annotation: token.annotation.map(str::to_string),
        }
    }
}

/// Parser for the output of Unix `traceroute`.
///
/// # Examples
///
/// ```
/// use traceparse::TracerouteParser;
///
/// let output = "traceroute to example.com (93.184.216.34), 30 hops max, 60 byte packets\n\
///               1  192.0.2.1 (192.0.2.1)  1.234 ms  1.456 ms  1.789 ms\n\
///               2  *\n";
///
/// let result = TracerouteParser::new().parse_offline(output).unwrap();
/// assert_eq!(result.target, "example.com");
/// assert_eq!(result.hops.len(), 2);
/// assert_eq!(result.hops[0].probes.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TracerouteParser {
    grammar: Grammar,
}

impl TracerouteParser {
    /// Create a parser with a freshly compiled grammar
    pub fn new() -> Self {
        Self {
            grammar: Grammar::new(),
        }
    }

    /// Parse traceroute output, enriching probes with origin ASNs.
    ///
    /// When `asn` is `Some`, every probe whose address is known but whose AS
    /// was not printed triggers one lookup; the answer is stored as
    /// `"AS<number>"` and carried to following probes like a printed value.
    /// Lookups run one at a time in hop-then-probe order.
    ///
    /// Returns `None` only when the header line is not recognised. Lines
    /// that are not hop lines are skipped.
    pub async fn parse(&self, data: &str, asn: Option<&dyn AsnSource>) -> Option<TracerouteResult> {
        let mut result = self.header(data)?;

        // Collected up front so no regex iterator is held across a lookup
        let lines: Vec<_> = self.grammar.hop_lines(data).collect();
        for line in lines {
            let tokens: Vec<_> = self.grammar.probes(line.probes).collect();
            let mut sticky = StickyFields::default();
            let mut probes = Vec::with_capacity(tokens.len());

            for token in tokens {
                sticky.update(&token);
                if let (Some(source), Some(ip)) = (asn, sticky.needs_asn()) {
                    sticky.asn = source.origin_asn(ip).await.map(|n| format!("AS{n}"));
                }
                probes.push(sticky.probe(&token));
            }

            result.hops.push(Hop {
                hop: line.hop,
                probes,
            });
        }

        Some(result)
    }

    /// Parse traceroute output without any ASN lookups
    pub fn parse_offline(&self, data: &str) -> Option<TracerouteResult> {
        let mut result = self.header(data)?;

        result.hops = self
            .grammar
            .hop_lines(data)
            .map(|line| {
                let mut sticky = StickyFields::default();
                let probes = self
                    .grammar
                    .probes(line.probes)
                    .map(|token| {
                        sticky.update(&token);
                        sticky.probe(&token)
                    })
                    .collect();
                Hop {
                    hop: line.hop,
                    probes,
                }
            })
            .collect();

        Some(result)
    }

    fn header(&self, data: &str) -> Option<TracerouteResult> {
        let Some(header) = self.grammar.header(data) else {
            log::debug!("traceroute header not recognised");
            return None;
        };
        Some(TracerouteResult {
            target: header.target.to_string(),
            target_ip: header.target_ip.map(str::to_string),
            hops_max: header.hops_max,
            pkt_size: header.pkt_size,
            hops: Vec::new(),
        })
    }
}
