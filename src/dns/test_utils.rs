//! Test utilities for DNS module

use super::txt::{TxtLookup, TxtLookupError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory TXT lookup that counts every query it receives
#[derive(Debug, Default)]
pub struct StubTxtLookup {
    records: HashMap<String, Vec<Vec<String>>>,
    queries: AtomicUsize,
}

impl StubTxtLookup {
    /// Create an empty stub; every query fails with a resolution error
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `name` with a single record made of one string segment
    pub fn with_record(mut self, name: &str, segment: &str) -> Self {
        self.records
            .insert(name.to_string(), vec![vec![segment.to_string()]]);
        self
    }

    /// Answer `name` with the given records
    pub fn with_records(mut self, name: &str, records: Vec<Vec<String>>) -> Self {
        self.records.insert(name.to_string(), records);
        self
    }

    /// Number of queries issued so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TxtLookup for StubTxtLookup {
    async fn txt(&self, name: &str) -> Result<Vec<Vec<String>>, TxtLookupError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.records
            .get(name)
            .cloned()
            .ok_or_else(|| TxtLookupError::Resolution(format!("NXDOMAIN: {name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_counts_queries() {
        let stub = StubTxtLookup::new().with_record("a.example.", "1 | x");
        assert_eq!(stub.query_count(), 0);

        let records = stub.txt("a.example.").await.unwrap();
        assert_eq!(records, vec![vec!["1 | x".to_string()]]);
        assert!(stub.txt("b.example.").await.is_err());
        assert_eq!(stub.query_count(), 2);
    }
}
