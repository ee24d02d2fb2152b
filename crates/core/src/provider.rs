use crate::binding::TableBinding;
use crate::error::RefdataError;
use crate::record::ValueRecord;

/// Read access to the persisted records behind a binding.
pub trait ValueProvider {
    /// Every persisted record for the bound table, in natural store order.
    /// Must not mutate external state.
    fn values(&self, binding: &TableBinding) -> Result<Vec<ValueRecord>, RefdataError>;
}

/// Read/write access. Operations are per-record and non-batched; a backend
/// failure propagates immediately, and nothing already applied is rolled
/// back.
pub trait UpdateProvider: ValueProvider {
    fn insert_value(&self, binding: &TableBinding, record: &ValueRecord) -> Result<(), RefdataError>;

    /// Rewrite name, display name and properties of the row matching the
    /// record's key.
    fn update_value(&self, binding: &TableBinding, record: &ValueRecord) -> Result<(), RefdataError>;

    /// Delete every row of the bound table.
    fn clear(&self, binding: &TableBinding) -> Result<(), RefdataError>;
}
