use std::any::TypeId;
use std::collections::HashMap;

use once_cell::sync::OnceCell;

use crate::binding::TableBinding;
use crate::catalog::Catalog;
use crate::error::RefdataError;
use crate::record::ValueRecord;

/// A reference-data enumeration: a fixed set of records known at compile
/// time.
pub trait Enumeration: 'static {
    /// Diagnostic type name, used in every message that names the type.
    const NAME: &'static str;

    /// The full member list. Order does not matter; catalogs sort by key.
    fn values() -> Vec<ValueRecord>;
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Everything the registry keeps per enumeration type: the captured entry
/// point, the binding and the memoized catalog.
#[derive(Debug)]
pub struct Registration {
    type_id: TypeId,
    type_name: &'static str,
    values_fn: fn() -> Vec<ValueRecord>,
    binding: TableBinding,
    default_key: Option<i64>,
    catalog: OnceCell<Catalog>,
}

impl Registration {
    pub fn of<E: Enumeration>(binding: TableBinding) -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            type_name: E::NAME,
            values_fn: E::values,
            binding,
            default_key: None,
            catalog: OnceCell::new(),
        }
    }

    /// Declare the member that defaulting lookups fall back to. Checked
    /// against the records when the catalog is first built.
    pub fn with_default_key(mut self, key: i64) -> Self {
        self.default_key = Some(key);
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn binding(&self) -> &TableBinding {
        &self.binding
    }

    /// The memoized catalog. Built from the captured entry point on first
    /// call; a failed build is re-attempted (and fails identically) on the
    /// next call.
    pub fn catalog(&self) -> Result<&Catalog, RefdataError> {
        self.catalog.get_or_try_init(|| {
            let catalog = Catalog::new(self.type_name, (self.values_fn)())?;
            match self.default_key {
                Some(key) => catalog.with_default_key(key),
                None => Ok(catalog),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Caller-owned type registry. Registration is explicit; there is no global
/// discovery and no global state, so tests build a fresh registry apiece.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Registration>,
    index: HashMap<TypeId, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type with its binding. Fails on a duplicate registration
    /// or an invalid binding.
    pub fn register<E: Enumeration>(&mut self, binding: TableBinding) -> Result<(), RefdataError> {
        self.insert(Registration::of::<E>(binding))
    }

    /// Register from a prebuilt descriptor (the form that can carry a
    /// default key).
    pub fn insert(&mut self, registration: Registration) -> Result<(), RefdataError> {
        registration.binding.validate()?;
        if self.index.contains_key(&registration.type_id) {
            return Err(RefdataError::AlreadyRegistered(registration.type_name.to_string()));
        }
        self.index.insert(registration.type_id, self.entries.len());
        self.entries.push(registration);
        Ok(())
    }

    pub fn binding<E: Enumeration>(&self) -> Result<&TableBinding, RefdataError> {
        Ok(&self.entry::<E>()?.binding)
    }

    pub fn catalog<E: Enumeration>(&self) -> Result<&Catalog, RefdataError> {
        self.entry::<E>()?.catalog()
    }

    /// Registrations in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Registration> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry<E: Enumeration>(&self) -> Result<&Registration, RefdataError> {
        self.index
            .get(&TypeId::of::<E>())
            .map(|&i| &self.entries[i])
            .ok_or_else(|| RefdataError::NotRegistered(E::NAME.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct OrderStatus;

    impl Enumeration for OrderStatus {
        const NAME: &'static str = "OrderStatus";
        fn values() -> Vec<ValueRecord> {
            vec![
                ValueRecord::new(1, "Open"),
                ValueRecord::new(2, "Shipped").with_display_name("Shipped to customer"),
            ]
        }
    }

    struct Priority;

    impl Enumeration for Priority {
        const NAME: &'static str = "Priority";
        fn values() -> Vec<ValueRecord> {
            vec![ValueRecord::new(1, "Low"), ValueRecord::new(2, "High")]
        }
    }

    struct BrokenSet;

    impl Enumeration for BrokenSet {
        const NAME: &'static str = "BrokenSet";
        fn values() -> Vec<ValueRecord> {
            vec![ValueRecord::new(1, "A"), ValueRecord::new(1, "B")]
        }
    }

    #[test]
    fn register_and_resolve() {
        let mut registry = Registry::new();
        registry.register::<OrderStatus>(TableBinding::new("Ref", "OrderStatuses")).unwrap();

        let binding = registry.binding::<OrderStatus>().unwrap();
        assert_eq!(binding.key_column(), "OrderStatusKey");

        let catalog = registry.catalog::<OrderStatus>().unwrap();
        assert_eq!(catalog.type_name(), "OrderStatus");
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn unregistered_type_fails() {
        let registry = Registry::new();
        match registry.binding::<OrderStatus>() {
            Err(RefdataError::NotRegistered(name)) => assert_eq!(name, "OrderStatus"),
            other => panic!("expected not registered error, got {other:?}"),
        }
        assert!(registry.catalog::<OrderStatus>().is_err());
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = Registry::new();
        registry.register::<OrderStatus>(TableBinding::new("Ref", "OrderStatuses")).unwrap();
        match registry.register::<OrderStatus>(TableBinding::new("Ref", "Other")) {
            Err(RefdataError::AlreadyRegistered(name)) => assert_eq!(name, "OrderStatus"),
            other => panic!("expected already registered error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_binding_is_rejected_at_registration() {
        let mut registry = Registry::new();
        let binding = TableBinding::new("Ref", "OrderStatuses")
            .with_property("Weight", "A")
            .with_property("Weight", "B");
        assert!(matches!(
            registry.register::<OrderStatus>(binding),
            Err(RefdataError::DuplicatePropertyBinding { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn catalog_is_built_once() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        struct Counted;

        impl Enumeration for Counted {
            const NAME: &'static str = "Counted";
            fn values() -> Vec<ValueRecord> {
                CALLS.fetch_add(1, Ordering::SeqCst);
                vec![ValueRecord::new(1, "One")]
            }
        }

        let mut registry = Registry::new();
        registry.register::<Counted>(TableBinding::new("Ref", "Counted")).unwrap();
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);

        registry.catalog::<Counted>().unwrap();
        registry.catalog::<Counted>().unwrap();
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn bad_member_list_surfaces_at_first_use() {
        let mut registry = Registry::new();
        registry.register::<BrokenSet>(TableBinding::new("Ref", "Broken")).unwrap();
        assert!(matches!(
            registry.catalog::<BrokenSet>(),
            Err(RefdataError::DuplicateKey { key: 1, .. })
        ));
        // Still broken on the second call.
        assert!(registry.catalog::<BrokenSet>().is_err());
    }

    #[test]
    fn default_key_flows_into_the_catalog() {
        let mut registry = Registry::new();
        registry
            .insert(
                Registration::of::<OrderStatus>(TableBinding::new("Ref", "OrderStatuses"))
                    .with_default_key(1),
            )
            .unwrap();
        let catalog = registry.catalog::<OrderStatus>().unwrap();
        assert_eq!(catalog.default_value().map(|r| r.name.as_str()), Some("Open"));
    }

    #[test]
    fn unknown_default_key_surfaces_at_first_use() {
        let mut registry = Registry::new();
        registry
            .insert(
                Registration::of::<OrderStatus>(TableBinding::new("Ref", "OrderStatuses"))
                    .with_default_key(42),
            )
            .unwrap();
        assert!(matches!(
            registry.catalog::<OrderStatus>(),
            Err(RefdataError::UnknownDefaultKey { key: 42, .. })
        ));
    }

    #[test]
    fn iteration_follows_registration_order() {
        let mut registry = Registry::new();
        registry.register::<Priority>(TableBinding::new("Ref", "Priorities")).unwrap();
        registry.register::<OrderStatus>(TableBinding::new("Ref", "OrderStatuses")).unwrap();
        let names: Vec<&str> = registry.iter().map(|e| e.type_name()).collect();
        assert_eq!(names, ["Priority", "OrderStatus"]);
        assert_eq!(registry.len(), 2);
    }
}
