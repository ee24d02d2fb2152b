use refdata_core::{Catalog, Enumeration, RefdataError, Registry, TableBinding, ValueProvider};

/// Read-only comparison of catalogs against a store.
///
/// Records are compared by position in natural store order, not by key:
/// a store holding the right records in the wrong order verifies dirty
/// even though reconciliation (which matches by key) would change nothing.
pub struct Verifier<'a> {
    registry: &'a Registry,
    provider: &'a dyn ValueProvider,
}

impl<'a> Verifier<'a> {
    pub fn new(registry: &'a Registry, provider: &'a dyn ValueProvider) -> Self {
        Self { registry, provider }
    }

    /// Differences for one type, one message per finding; empty means the
    /// store matches. Never mutates the store.
    pub fn verify<E: Enumeration>(&self) -> Result<Vec<String>, RefdataError> {
        let binding = self.registry.binding::<E>()?;
        let catalog = self.registry.catalog::<E>()?;
        self.verify_catalog(catalog, binding)
    }

    /// Every registered type, in registration order, messages concatenated.
    pub fn verify_all(&self) -> Result<Vec<String>, RefdataError> {
        let mut messages = Vec::new();
        for entry in self.registry.iter() {
            let catalog = entry.catalog()?;
            messages.extend(self.verify_catalog(catalog, entry.binding())?);
        }
        Ok(messages)
    }

    fn verify_catalog(&self, catalog: &Catalog, binding: &TableBinding) -> Result<Vec<String>, RefdataError> {
        let persisted = self.provider.values(binding)?;

        // A count mismatch is one message, not one per trailing record.
        if catalog.len() != persisted.len() {
            return Ok(vec![format!(
                "{}: element count mismatch: catalog has {} and store has {}",
                catalog.type_name(),
                catalog.len(),
                persisted.len()
            )]);
        }

        let mut messages = Vec::new();
        for (expected, actual) in catalog.iter().zip(&persisted) {
            if !expected.same_entry(actual) {
                messages.push(format!(
                    "{}.{} does not match - catalog: {} - store: {}",
                    catalog.type_name(),
                    expected.name,
                    expected,
                    actual
                ));
            }
        }
        Ok(messages)
    }
}
