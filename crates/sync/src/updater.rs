use serde::Serialize;

use refdata_core::{
    Catalog, Enumeration, RefdataError, Registry, TableBinding, UpdateProvider, ValueRecord,
};

/// Counts of applied mutations for one reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpdateStats {
    pub add_count: usize,
    pub update_count: usize,
}

/// Applies the minimal inserts and updates to make a store match its
/// catalogs.
///
/// Matching is by key, unlike the positional [`Verifier`]: a store holding
/// the right records in the wrong order reconciles to zero operations.
///
/// [`Verifier`]: crate::Verifier
pub struct Updater<'a> {
    registry: &'a Registry,
    provider: &'a dyn UpdateProvider,
}

impl<'a> Updater<'a> {
    pub fn new(registry: &'a Registry, provider: &'a dyn UpdateProvider) -> Self {
        Self { registry, provider }
    }

    /// Reconcile one type. Store keys the catalog does not know abort the
    /// run before any mutation. A mutation failure propagates immediately;
    /// earlier mutations stay applied, and re-running converges.
    pub fn update<E: Enumeration>(&self) -> Result<UpdateStats, RefdataError> {
        let binding = self.registry.binding::<E>()?;
        let catalog = self.registry.catalog::<E>()?;
        self.update_catalog(catalog, binding)
    }

    /// Every registered type, in registration order, stats summed. Stops at
    /// the first failure.
    pub fn update_all(&self) -> Result<UpdateStats, RefdataError> {
        let mut total = UpdateStats::default();
        for entry in self.registry.iter() {
            let stats = self.update_catalog(entry.catalog()?, entry.binding())?;
            total.add_count += stats.add_count;
            total.update_count += stats.update_count;
        }
        Ok(total)
    }

    /// Delete every row of one type's table.
    pub fn clear<E: Enumeration>(&self) -> Result<(), RefdataError> {
        let binding = self.registry.binding::<E>()?;
        self.provider.clear(binding)
    }

    /// Delete every registered type's rows, in registration order.
    pub fn clear_all(&self) -> Result<(), RefdataError> {
        for entry in self.registry.iter() {
            self.provider.clear(entry.binding())?;
        }
        Ok(())
    }

    fn update_catalog(&self, catalog: &Catalog, binding: &TableBinding) -> Result<UpdateStats, RefdataError> {
        let mut remaining = self.provider.values(binding)?;
        let mut inserts: Vec<&ValueRecord> = Vec::new();
        let mut updates: Vec<&ValueRecord> = Vec::new();

        for expected in catalog.iter() {
            match remaining.iter().position(|r| r.key == expected.key) {
                None => inserts.push(expected),
                Some(i) => {
                    let actual = remaining.remove(i);
                    if !expected.same_entry(&actual) {
                        updates.push(expected);
                    }
                }
            }
        }

        // Anything left in the store is unknown to the catalog. Refuse to
        // touch the table at all rather than guess.
        if !remaining.is_empty() {
            return Err(RefdataError::ExtraValues {
                type_name: catalog.type_name().to_string(),
                orphans: remaining.into_iter().map(|r| (r.key, r.name)).collect(),
            });
        }

        for record in &inserts {
            self.provider.insert_value(binding, record)?;
        }
        for record in &updates {
            self.provider.update_value(binding, record)?;
        }

        Ok(UpdateStats {
            add_count: inserts.len(),
            update_count: updates.len(),
        })
    }
}
