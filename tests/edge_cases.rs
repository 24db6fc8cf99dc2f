//! Integration tests for malformed and unusual traceroute output

#![allow(clippy::unwrap_used)]

use traceparse::{Probe, Rtt, TracerouteParser};

const HEADER: &str = "traceroute to example.com (93.184.216.34), 30 hops max, 60 byte packets\n";

fn parse(body: &str) -> traceparse::TracerouteResult {
    TracerouteParser::new()
        .parse_offline(&format!("{HEADER}{body}"))
        .unwrap()
}

#[test]
fn test_header_only() {
    let result = TracerouteParser::new().parse_offline(HEADER).unwrap();
    assert!(result.hops.is_empty());
}

#[test]
fn test_header_without_trailing_newline() {
    let result = TracerouteParser::new()
        .parse_offline(HEADER.trim_end())
        .unwrap();
    assert_eq!(result.target, "example.com");
}

#[test]
fn test_header_with_ipv6_target() {
    let result = TracerouteParser::new()
        .parse_offline(
            "traceroute to ipv6.google.com (2a00:1450:4001:82b::200e), 30 hops max, 80 byte packets\n\
              1  2001:db8::1 (2001:db8::1)  0.401 ms  0.390 ms  0.377 ms\n",
        )
        .unwrap();
    assert_eq!(result.target_ip.as_deref(), Some("2a00:1450:4001:82b::200e"));
    assert_eq!(result.pkt_size, 80);
    assert_eq!(result.hops[0].probes[0].ip.as_deref(), Some("2001:db8::1"));
}

#[test]
fn test_leading_noise_rejects_whole_output() {
    let parser = TracerouteParser::new();
    assert!(parser
        .parse_offline(&format!("traceroute: Warning: multiple interfaces\n{HEADER}"))
        .is_none());
}

#[test]
fn test_crlf_line_endings() {
    let data = HEADER.replace('\n', "\r\n")
        + " 1  gw (10.0.0.1)  0.5 ms  0.6 ms  0.7 ms\r\n 2  * * *\r\n";
    let result = TracerouteParser::new().parse_offline(&data).unwrap();
    assert_eq!(result.hops.len(), 2);
    assert_eq!(result.hops[0].probes.len(), 3);
    assert_eq!(result.hops[1].probes.len(), 3);
}

#[test]
fn test_truncated_hop_line() {
    // Output cut off in the middle of a probe
    let result = parse(" 1  gw (10.0.0.1)  0.5 ms  0.6");
    assert_eq!(result.hops.len(), 1);
    assert_eq!(result.hops[0].probes.len(), 1);
}

#[test]
fn test_lines_without_hop_number_are_skipped() {
    let result = parse(
        "     router.example (192.0.2.9)  1.0 ms\n\
         send failed: Network is unreachable\n\
          3  * * *\n",
    );
    assert_eq!(result.hops.len(), 1);
    assert_eq!(result.hops[0].hop, 3);
}

#[test]
fn test_mixed_timeouts_and_replies() {
    let result = parse(" 9  * edge.example (198.51.100.20)  30.2 ms *\n");
    let probes = &result.hops[0].probes;
    assert_eq!(probes.len(), 3);
    assert_eq!(probes[0], Probe::default());
    assert_eq!(probes[1].rtt, Some(Rtt::Millis(30.2)));

    // The trailing timeout inherits the responder identity but has no RTT
    assert_eq!(probes[2].ip.as_deref(), Some("198.51.100.20"));
    assert_eq!(probes[2].rtt, None);
    assert_eq!(probes[2].annotation, None);
}

#[test]
fn test_large_hop_numbers() {
    let result = parse("255  * * *\n");
    assert_eq!(result.hops[0].hop, 255);
}

#[test]
fn test_non_utf8_input_decoded_lossily() {
    let raw = [HEADER.as_bytes(), b" 1  r\xffouter (10.0.0.1)  1.0 ms\n"].concat();
    let data = String::from_utf8_lossy(&raw);
    let result = TracerouteParser::new().parse_offline(&data).unwrap();
    assert_eq!(result.hops[0].probes[0].name.as_deref(), Some("r\u{fffd}outer"));
}
