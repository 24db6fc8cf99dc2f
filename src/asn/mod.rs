//! ASN (Autonomous System Number) lookup functionality

pub mod lookup;
pub mod service;

pub use lookup::{is_special_use, origin_query_name, AsnLookupError};
pub use service::{AsnLookup, AsnSource};
