//! Reverse-DNS name construction

use std::fmt::Write;
use std::net::IpAddr;

/// Zone suffix of IPv4 reverse names
pub const IPV4_REVERSE_SUFFIX: &str = ".in-addr.arpa.";

/// Zone suffix of IPv6 reverse names
pub const IPV6_REVERSE_SUFFIX: &str = ".ip6.arpa.";

/// Build the fully qualified reverse-DNS name of an address.
///
/// IPv4 addresses become `d.c.b.a.in-addr.arpa.`, IPv6 addresses become
/// their 32 nibbles in reverse order followed by `.ip6.arpa.`.
pub fn reverse_name(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let o = v4.octets();
            format!(
                "{}.{}.{}.{}{}",
                o[3], o[2], o[1], o[0], IPV4_REVERSE_SUFFIX
            )
        }
        IpAddr::V6(v6) => {
            let mut name = String::with_capacity(72);
            for byte in v6.octets().iter().rev() {
                // low nibble first, since the whole address is reversed
                let _ = write!(name, "{:x}.{:x}.", byte & 0x0f, byte >> 4);
            }
            name.pop();
            name.push_str(IPV6_REVERSE_SUFFIX);
            name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_reverse_name_ipv4() {
        let ip = IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34));
        assert_eq!(reverse_name(ip), "34.216.184.93.in-addr.arpa.");
    }

    #[test]
    fn test_reverse_name_ipv6() {
        let ip: IpAddr = "2001:db8::567:89ab".parse().unwrap();
        assert_eq!(
            reverse_name(ip),
            "b.a.9.8.7.6.5.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.8.b.d.0.1.0.0.2.ip6.arpa."
        );
    }

    #[test]
    fn test_reverse_name_ipv6_nibble_count() {
        let ip = IpAddr::V6(Ipv6Addr::LOCALHOST);
        let name = reverse_name(ip);
        let labels: Vec<&str> = name
            .trim_end_matches(IPV6_REVERSE_SUFFIX)
            .split('.')
            .collect();
        assert_eq!(labels.len(), 32);
        assert_eq!(labels[0], "1");
        assert!(labels[1..].iter().all(|l| *l == "0"));
    }
}
