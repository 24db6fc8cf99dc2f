//! Text grammar of Unix traceroute output

use regex::Regex;

/// Header line, e.g.
/// `traceroute to example.com (93.184.216.34), 30 hops max, 60 byte packets`
const HEADER_PATTERN: &str = concat!(
    r"^traceroute to (?P<target>\S+?)\s*(?:\((?P<target_ip>\S+)\))?[\s,]+",
    r"(?P<hops_max>\d+)\s+hops max[\s,]+(?P<pkt_size>\d+)\sbyte packets",
);

/// Any line starting with a hop number. Only horizontal whitespace is
/// allowed around the number so a hop never swallows the next line.
const HOP_PATTERN: &str = r"(?m)^[^\S\n]*(?P<hop>\d+)[^\S\n]+(?P<probes>.*)$";

/// One probe on a hop line: optional responder identity followed by either
/// an RTT (with an optional `!` annotation) or a timeout star
const PROBE_PATTERN: &str = concat!(
    r"(?:(?P<name>[^\s*]+)?\s+)?",
    r"(?:\(\s*(?P<ip>\S+)\s*\)\s+)?",
    r"(?:\[(?P<asn>\S+)\]\s+)?",
    r"(?:(?P<rtt>[\d.]+?)\s+ms(?:\s+(?P<annotation>![^\s]*))?|\s*(?P<star>\*)\s*)",
);

/// Fields of a matched header line
#[derive(Debug, Clone, PartialEq)]
pub struct Header<'a> {
    /// Target as given to traceroute
    pub target: &'a str,
    /// Resolved target address, when printed
    pub target_ip: Option<&'a str>,
    /// Maximum hop count
    pub hops_max: u32,
    /// Probe packet size in bytes
    pub pkt_size: u32,
}

/// A hop line split into its number and the remaining probe text
#[derive(Debug, Clone, PartialEq)]
pub struct HopLine<'a> {
    /// Hop index as printed
    pub hop: u32,
    /// Text following the hop index
    pub probes: &'a str,
}

/// Fields printed for one probe, before sticky values are applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeToken<'a> {
    /// Hostname token
    pub name: Option<&'a str>,
    /// Parenthesized address
    pub ip: Option<&'a str>,
    /// Bracketed AS annotation as printed (may be `*`)
    pub asn: Option<&'a str>,
    /// RTT text without the unit
    pub rtt: Option<&'a str>,
    /// `!`-prefixed marker after the RTT
    pub annotation: Option<&'a str>,
    /// Whether the probe was a timeout star
    pub timeout: bool,
}

/// Compiled traceroute grammar.
///
/// Patterns are compiled once and never mutated; a `Grammar` can be shared
/// freely between threads.
#[derive(Debug, Clone)]
pub struct Grammar {
    header: Regex,
    hop: Regex,
    probe: Regex,
}

impl Grammar {
    /// Compile the grammar
    pub fn new() -> Self {
        Self {
            header: Regex::new(HEADER_PATTERN).expect("header pattern is valid"),
            hop: Regex::new(HOP_PATTERN).expect("hop pattern is valid"),
            probe: Regex::new(PROBE_PATTERN).expect("probe pattern is valid"),
        }
    }

    /// Match the header at the very start of `data`.
    ///
    /// Returns `None` if the header is missing or its counts do not fit a
    /// `u32`.
    pub fn header<'a>(&self, data: &'a str) -> Option<Header<'a>> {
        let caps = self.header.captures(data)?;
        Some(Header {
            target: caps.name("target")?.as_str(),
            target_ip: caps.name("target_ip").map(|m| m.as_str()),
            hops_max: caps.name("hops_max")?.as_str().parse().ok()?,
            pkt_size: caps.name("pkt_size")?.as_str().parse().ok()?,
        })
    }

    /// Iterate over every hop line in `data`, in input order
    pub fn hop_lines<'a>(&'a self, data: &'a str) -> impl Iterator<Item = HopLine<'a>> + 'a {
        self.hop.captures_iter(data).filter_map(|caps| {
            let hop = caps.name("hop")?.as_str();
            let Ok(hop) = hop.parse() else {
                log::trace!("skipping hop line with out-of-range index {hop}");
                return None;
            };
            Some(HopLine {
                hop,
                probes: caps.name("probes").map_or("", |m| m.as_str()),
            })
        })
    }

    /// Tokenize the probe text of one hop line, left to right
    pub fn probes<'a>(&'a self, line: &'a str) -> impl Iterator<Item = ProbeToken<'a>> + 'a {
        self.probe.captures_iter(line).map(|caps| ProbeToken {
            name: caps.name("name").map(|m| m.as_str()),
            ip: caps.name("ip").map(|m| m.as_str()),
            asn: caps.name("asn").map(|m| m.as_str()),
            rtt: caps.name("rtt").map(|m| m.as_str()),
            annotation: caps.name("annotation").map(|m| m.as_str()),
            timeout: caps.name("star").is_some(),
        })
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_with_address() {
        let g = Grammar::new();
        let header = g
            .header("traceroute to example.com (93.184.216.34), 30 hops max, 60 byte packets\n")
            .unwrap();
        assert_eq!(
            header,
            Header {
                target: "example.com",
                target_ip: Some("93.184.216.34"),
                hops_max: 30,
                pkt_size: 60,
            }
        );
    }

    #[test]
    fn test_header_variants() {
        let g = Grammar::new();

        // BSD/macOS style without the resolved address
        let header = g
            .header("traceroute to 8.8.8.8, 64 hops max, 52 byte packets")
            .unwrap();
        assert_eq!(header.target, "8.8.8.8");
        assert_eq!(header.target_ip, None);
        assert_eq!(header.hops_max, 64);
        assert_eq!(header.pkt_size, 52);

        // Whitespace-only separators
        let header = g
            .header("traceroute to host (10.0.0.1) 5 hops max 40 byte packets")
            .unwrap();
        assert_eq!(header.target_ip, Some("10.0.0.1"));
        assert_eq!(header.hops_max, 5);
        assert_eq!(header.pkt_size, 40);
    }

    #[test]
    fn test_header_rejects_other_text() {
        let g = Grammar::new();
        assert!(g.header("").is_none());
        assert!(g.header("PING example.com (93.184.216.34) 56(84) bytes of data.").is_none());
        assert!(g
            .header(" 1  192.0.2.1 (192.0.2.1)  1.234 ms")
            .is_none());
        // Must be at the start of the input
        assert!(g
            .header("warning\ntraceroute to a (1.1.1.1), 30 hops max, 60 byte packets")
            .is_none());
        // Counts must fit a u32
        assert!(g
            .header("traceroute to a, 99999999999 hops max, 60 byte packets")
            .is_none());
    }

    #[test]
    fn test_hop_lines() {
        let g = Grammar::new();
        let data = "traceroute to a (1.1.1.1), 30 hops max, 60 byte packets\n 1  * * *\n\
                    not a hop\n10  x (1.1.1.1)  5.0 ms\n";
        let lines: Vec<_> = g.hop_lines(data).collect();
        assert_eq!(
            lines,
            vec![
                HopLine { hop: 1, probes: "* * *" },
                HopLine { hop: 10, probes: "x (1.1.1.1)  5.0 ms" },
            ]
        );
    }

    #[test]
    fn test_hop_line_does_not_span_lines() {
        let g = Grammar::new();
        let lines: Vec<_> = g.hop_lines(" 3\n 4  * * *\r\n").collect();
        assert_eq!(lines, vec![HopLine { hop: 4, probes: "* * *\r" }]);
    }

    #[test]
    fn test_probe_tokens() {
        let g = Grammar::new();
        let tokens: Vec<_> = g
            .probes("gw.example.net (192.0.2.1) [AS64500]  1.234 ms !H  * 2.5 ms")
            .collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(
            tokens[0],
            ProbeToken {
                name: Some("gw.example.net"),
                ip: Some("192.0.2.1"),
                asn: Some("AS64500"),
                rtt: Some("1.234"),
                annotation: Some("!H"),
                timeout: false,
            }
        );
        assert_eq!(
            tokens[1],
            ProbeToken {
                timeout: true,
                ..Default::default()
            }
        );
        assert_eq!(tokens[2].rtt, Some("2.5"));
        assert_eq!(tokens[2].name, None);
    }

    #[test]
    fn test_probe_tokens_unknown_asn() {
        let g = Grammar::new();
        let tokens: Vec<_> = g.probes("10.0.0.1 (10.0.0.1) [*]  0.512 ms").collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].asn, Some("*"));
    }
}
