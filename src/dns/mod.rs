//! DNS primitives used by the origin ASN lookup

pub mod reverse;
pub mod txt;

#[cfg(test)]
pub mod test_utils;

pub use reverse::reverse_name;
pub use txt::{SystemTxtLookup, TxtLookup, TxtLookupError};
