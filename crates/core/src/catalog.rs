use serde::Serialize;

use crate::error::RefdataError;
use crate::record::ValueRecord;

/// The compile-time truth for one enumeration type: its records, sorted by
/// ascending key.
///
/// Keys must be unique; duplicate names are not validated, and name lookups
/// return the first match in key order.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    type_name: String,
    records: Vec<ValueRecord>,
    default_key: Option<i64>,
}

impl Catalog {
    pub fn new(type_name: impl Into<String>, mut records: Vec<ValueRecord>) -> Result<Self, RefdataError> {
        let type_name = type_name.into();
        records.sort_by_key(|r| r.key);
        for pair in records.windows(2) {
            if pair[0].key == pair[1].key {
                return Err(RefdataError::DuplicateKey {
                    type_name,
                    key: pair[0].key,
                });
            }
        }
        Ok(Self {
            type_name,
            records,
            default_key: None,
        })
    }

    /// Declare the member that `_or_default` lookups fall back to.
    pub fn with_default_key(mut self, key: i64) -> Result<Self, RefdataError> {
        if !self.is_valid_key(key) {
            return Err(RefdataError::UnknownDefaultKey {
                type_name: self.type_name,
                key,
            });
        }
        self.default_key = Some(key);
        Ok(self)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn records(&self) -> &[ValueRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValueRecord> {
        self.records.iter()
    }

    // -----------------------------------------------------------------------
    // Member lookup
    // -----------------------------------------------------------------------

    pub fn from_key(&self, key: i64) -> Option<&ValueRecord> {
        self.records
            .binary_search_by_key(&key, |r| r.key)
            .ok()
            .map(|i| &self.records[i])
    }

    pub fn from_name(&self, name: &str) -> Option<&ValueRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn from_display_name(&self, display_name: &str) -> Option<&ValueRecord> {
        self.records.iter().find(|r| r.display_name == display_name)
    }

    pub fn default_value(&self) -> Option<&ValueRecord> {
        self.default_key.and_then(|key| self.from_key(key))
    }

    pub fn from_key_or_default(&self, key: i64) -> Option<&ValueRecord> {
        self.from_key(key).or_else(|| self.default_value())
    }

    pub fn from_name_or_default(&self, name: &str) -> Option<&ValueRecord> {
        self.from_name(name).or_else(|| self.default_value())
    }

    pub fn from_display_name_or_default(&self, display_name: &str) -> Option<&ValueRecord> {
        self.from_display_name(display_name)
            .or_else(|| self.default_value())
    }

    pub fn is_valid_key(&self, key: i64) -> bool {
        self.from_key(key).is_some()
    }

    pub fn is_valid_name(&self, name: &str) -> bool {
        self.from_name(name).is_some()
    }

    pub fn is_valid_display_name(&self, display_name: &str) -> bool {
        self.from_display_name(display_name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_records() -> Vec<ValueRecord> {
        vec![
            ValueRecord::new(3, "Closed"),
            ValueRecord::new(1, "Open"),
            ValueRecord::new(2, "Shipped").with_display_name("Shipped to customer"),
        ]
    }

    #[test]
    fn records_sort_by_key() {
        let catalog = Catalog::new("OrderStatus", status_records()).unwrap();
        let keys: Vec<i64> = catalog.iter().map(|r| r.key).collect();
        assert_eq!(keys, [1, 2, 3]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let records = vec![ValueRecord::new(1, "Open"), ValueRecord::new(1, "Closed")];
        match Catalog::new("OrderStatus", records) {
            Err(RefdataError::DuplicateKey { type_name, key }) => {
                assert_eq!(type_name, "OrderStatus");
                assert_eq!(key, 1);
            }
            other => panic!("expected duplicate key error, got {other:?}"),
        }
    }

    #[test]
    fn lookups() {
        let catalog = Catalog::new("OrderStatus", status_records()).unwrap();
        assert_eq!(catalog.from_key(2).map(|r| r.name.as_str()), Some("Shipped"));
        assert_eq!(catalog.from_name("Open").map(|r| r.key), Some(1));
        assert_eq!(
            catalog.from_display_name("Shipped to customer").map(|r| r.key),
            Some(2)
        );
        assert!(catalog.from_key(9).is_none());
        assert!(catalog.is_valid_key(3));
        assert!(!catalog.is_valid_name("Reopened"));
        assert!(catalog.is_valid_display_name("Open"));
    }

    #[test]
    fn default_member_fallback() {
        let catalog = Catalog::new("OrderStatus", status_records())
            .unwrap()
            .with_default_key(1)
            .unwrap();
        assert_eq!(catalog.default_value().map(|r| r.name.as_str()), Some("Open"));
        assert_eq!(catalog.from_key_or_default(9).map(|r| r.key), Some(1));
        assert_eq!(catalog.from_name_or_default("Nope").map(|r| r.key), Some(1));
        assert_eq!(catalog.from_name_or_default("Closed").map(|r| r.key), Some(3));
    }

    #[test]
    fn no_default_means_no_fallback() {
        let catalog = Catalog::new("OrderStatus", status_records()).unwrap();
        assert!(catalog.default_value().is_none());
        assert!(catalog.from_key_or_default(9).is_none());
    }

    #[test]
    fn unknown_default_key_is_rejected() {
        let result = Catalog::new("OrderStatus", status_records())
            .unwrap()
            .with_default_key(42);
        match result {
            Err(RefdataError::UnknownDefaultKey { key, .. }) => assert_eq!(key, 42),
            other => panic!("expected unknown default key error, got {other:?}"),
        }
    }
}
