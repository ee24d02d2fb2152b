// In-memory provider for tests and dry runs.

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::Serialize;

use refdata_core::{RefdataError, TableBinding, UpdateProvider, ValueProvider, ValueRecord};

/// One mutation call, in call order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StoreOp {
    Insert(i64),
    Update(i64),
    Clear,
}

/// Rows held in memory per qualified table name. Records every mutation so
/// callers can assert exactly what was issued.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    tables: RefCell<BTreeMap<String, Vec<ValueRecord>>>,
    ops: RefCell<Vec<StoreOp>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rows behind a binding.
    pub fn seed(&self, binding: &TableBinding, records: Vec<ValueRecord>) {
        self.tables
            .borrow_mut()
            .insert(binding.qualified_table(), records);
    }

    /// Current rows behind a binding, in insertion order.
    pub fn rows(&self, binding: &TableBinding) -> Vec<ValueRecord> {
        self.tables
            .borrow()
            .get(&binding.qualified_table())
            .cloned()
            .unwrap_or_default()
    }

    /// Every mutation issued so far, across all tables.
    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.borrow().clone()
    }
}

impl ValueProvider for MemoryProvider {
    fn values(&self, binding: &TableBinding) -> Result<Vec<ValueRecord>, RefdataError> {
        Ok(self.rows(binding))
    }
}

impl UpdateProvider for MemoryProvider {
    fn insert_value(&self, binding: &TableBinding, record: &ValueRecord) -> Result<(), RefdataError> {
        self.ops.borrow_mut().push(StoreOp::Insert(record.key));
        self.tables
            .borrow_mut()
            .entry(binding.qualified_table())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    fn update_value(&self, binding: &TableBinding, record: &ValueRecord) -> Result<(), RefdataError> {
        self.ops.borrow_mut().push(StoreOp::Update(record.key));
        let mut tables = self.tables.borrow_mut();
        let rows = tables.entry(binding.qualified_table()).or_default();
        match rows.iter_mut().find(|r| r.key == record.key) {
            Some(row) => {
                *row = record.clone();
                Ok(())
            }
            None => Err(RefdataError::Store(format!(
                "no row with key {} in {}",
                record.key,
                binding.qualified_table()
            ))),
        }
    }

    fn clear(&self, binding: &TableBinding) -> Result<(), RefdataError> {
        self.ops.borrow_mut().push(StoreOp::Clear);
        self.tables.borrow_mut().remove(&binding.qualified_table());
        Ok(())
    }
}
