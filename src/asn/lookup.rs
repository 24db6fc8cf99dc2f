//! Origin ASN lookup using Team Cymru's DNS whois mirror

use crate::dns::reverse::{reverse_name, IPV4_REVERSE_SUFFIX, IPV6_REVERSE_SUFFIX};
use crate::dns::{TxtLookup, TxtLookupError};
use ipnet::{Ipv4Net, Ipv6Net};
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Zone answering IPv4 origin queries
pub const ORIGIN_V4_ZONE: &str = ".origin.asn.cymru.com.";

/// Zone answering IPv6 origin queries
pub const ORIGIN_V6_ZONE: &str = ".origin6.asn.cymru.com.";

/// Leading AS number of an origin TXT answer such as
/// `"15169 | 8.8.8.0/24 | US | arin | 2023-12-28"`. Multi-origin answers
/// (`"13335 209242 | ..."`) yield the first number.
pub(crate) const ORIGIN_ASN_PATTERN: &str = r"^\s*(?P<asn>\d+)(?:\s|$)";

/// IPv4 ranges that are never announced on the public internet
const SPECIAL_USE_V4: [Ipv4Net; 14] = [
    Ipv4Net::new_assert(Ipv4Addr::new(0, 0, 0, 0), 8),
    Ipv4Net::new_assert(Ipv4Addr::new(10, 0, 0, 0), 8),
    Ipv4Net::new_assert(Ipv4Addr::new(100, 64, 0, 0), 10),
    Ipv4Net::new_assert(Ipv4Addr::new(127, 0, 0, 0), 8),
    Ipv4Net::new_assert(Ipv4Addr::new(169, 254, 0, 0), 16),
    Ipv4Net::new_assert(Ipv4Addr::new(172, 16, 0, 0), 12),
    Ipv4Net::new_assert(Ipv4Addr::new(192, 0, 0, 0), 24),
    Ipv4Net::new_assert(Ipv4Addr::new(192, 0, 2, 0), 24),
    Ipv4Net::new_assert(Ipv4Addr::new(192, 168, 0, 0), 16),
    Ipv4Net::new_assert(Ipv4Addr::new(198, 18, 0, 0), 15),
    Ipv4Net::new_assert(Ipv4Addr::new(198, 51, 100, 0), 24),
    Ipv4Net::new_assert(Ipv4Addr::new(203, 0, 113, 0), 24),
    Ipv4Net::new_assert(Ipv4Addr::new(224, 0, 0, 0), 4),
    Ipv4Net::new_assert(Ipv4Addr::new(240, 0, 0, 0), 4),
];

/// IPv6 ranges that are never announced on the public internet
const SPECIAL_USE_V6: [Ipv6Net; 7] = [
    Ipv6Net::new_assert(Ipv6Addr::UNSPECIFIED, 128),
    Ipv6Net::new_assert(Ipv6Addr::LOCALHOST, 128),
    Ipv6Net::new_assert(Ipv6Addr::new(0, 0, 0, 0, 0, 0xffff, 0, 0), 96),
    Ipv6Net::new_assert(Ipv6Addr::new(0x2001, 0x0db8, 0, 0, 0, 0, 0, 0), 32),
    Ipv6Net::new_assert(Ipv6Addr::new(0xfc00, 0, 0, 0, 0, 0, 0, 0), 7),
    Ipv6Net::new_assert(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 0), 10),
    Ipv6Net::new_assert(Ipv6Addr::new(0xff00, 0, 0, 0, 0, 0, 0, 0), 8),
];

/// Error type for ASN lookup operations
#[derive(Debug, thiserror::Error)]
pub enum AsnLookupError {
    /// The input is not an IPv4 or IPv6 address
    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),

    /// Private or reserved address, no lookup attempted
    #[error("{0} is a private or reserved address")]
    SpecialUse(IpAddr),

    /// DNS resolution failed
    #[error(transparent)]
    Dns(#[from] TxtLookupError),

    /// The TXT query returned no records
    #[error("No ASN data found")]
    NotFound,

    /// The TXT answer does not start with an AS number
    #[error("Invalid ASN response format: {0:?}")]
    InvalidFormat(String),
}

/// Checks whether an address lies in a private or reserved range.
pub fn is_special_use(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => SPECIAL_USE_V4.iter().any(|net| net.contains(v4)),
        IpAddr::V6(v6) => SPECIAL_USE_V6.iter().any(|net| net.contains(v6)),
    }
}

/// Form the origin query name for an address.
///
/// The reverse-DNS name is reused as the key and only its zone suffix is
/// swapped, e.g. `34.216.184.93.in-addr.arpa.` becomes
/// `34.216.184.93.origin.asn.cymru.com.`.
pub fn origin_query_name(ip: IpAddr) -> String {
    let name = reverse_name(ip);
    if let Some(key) = name.strip_suffix(IPV4_REVERSE_SUFFIX) {
        format!("{key}{ORIGIN_V4_ZONE}")
    } else if let Some(key) = name.strip_suffix(IPV6_REVERSE_SUFFIX) {
        format!("{key}{ORIGIN_V6_ZONE}")
    } else {
        name
    }
}

/// Extract the AS number from an origin TXT segment.
///
/// Returns `None` when the segment does not start with digits; an empty
/// capture is never turned into an ASN.
pub fn extract_origin_asn(pattern: &Regex, segment: &str) -> Option<String> {
    pattern
        .captures(segment)
        .and_then(|caps| caps.name("asn"))
        .map(|m| m.as_str())
        .filter(|asn| !asn.is_empty())
        .map(str::to_string)
}

/// Performs a single origin ASN lookup for `ip`.
///
/// Exactly one TXT query is issued for public addresses and none for
/// private or reserved ones.
pub async fn lookup_origin_asn<Q>(
    ip: &str,
    txt: &Q,
    pattern: &Regex,
) -> Result<String, AsnLookupError>
where
    Q: TxtLookup + ?Sized,
{
    let addr: IpAddr = ip
        .trim()
        .parse()
        .map_err(|_| AsnLookupError::InvalidAddress(ip.to_string()))?;

    if is_special_use(&addr) {
        return Err(AsnLookupError::SpecialUse(addr));
    }

    let query = origin_query_name(addr);
    let records = txt.txt(&query).await?;

    let segment = records
        .first()
        .and_then(|record| record.first())
        .ok_or(AsnLookupError::NotFound)?;

    extract_origin_asn(pattern, segment)
        .ok_or_else(|| AsnLookupError::InvalidFormat(segment.clone()))
}

#[cfg(test)]
#[path = "lookup_tests.rs"]
mod lookup_tests;
