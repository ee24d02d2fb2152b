// Property-based tests for catalog/store reconciliation.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::cell::RefCell;

use proptest::prelude::*;

use refdata_core::{Enumeration, Registry, TableBinding, ValueRecord};
use refdata_store::MemoryProvider;
use refdata_sync::{UpdateStats, Updater, Verifier};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Catalog plumbing
// ---------------------------------------------------------------------------

// The registry resolves members through a type's entry point, so each case
// hands its generated member list to `GeneratedSet` through a thread local.
thread_local! {
    static MEMBERS: RefCell<Vec<ValueRecord>> = RefCell::new(Vec::new());
}

struct GeneratedSet;

impl Enumeration for GeneratedSet {
    const NAME: &'static str = "GeneratedSet";
    fn values() -> Vec<ValueRecord> {
        MEMBERS.with(|m| m.borrow().clone())
    }
}

fn registry_for(records: &[ValueRecord]) -> Registry {
    MEMBERS.with(|m| *m.borrow_mut() = records.to_vec());
    let mut registry = Registry::new();
    registry
        .register::<GeneratedSet>(TableBinding::new("Ref", "Generated"))
        .unwrap();
    registry
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Records with unique keys, in key order.
fn arb_records() -> impl Strategy<Value = Vec<ValueRecord>> {
    proptest::collection::btree_map(
        0i64..1000,
        (r"[A-Z][a-z]{1,8}", r"[A-Z][a-z ]{0,12}"),
        1..24,
    )
    .prop_map(|members| {
        members
            .into_iter()
            .map(|(key, (name, display_name))| {
                ValueRecord::new(key, name).with_display_name(display_name)
            })
            .collect()
    })
}

/// What happens to a catalog record on its way into the store.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Fate {
    Keep,
    Drop,
    Rename,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<ValueRecord>, Vec<Fate>, usize)> {
    arb_records().prop_flat_map(|records| {
        let n = records.len();
        (
            Just(records),
            proptest::collection::vec(
                prop_oneof![Just(Fate::Keep), Just(Fate::Drop), Just(Fate::Rename)],
                n,
            ),
            0usize..3,
        )
    })
}

/// Build the store rows according to each record's fate, plus `extras`
/// rows with keys the catalog does not know.
fn store_rows(records: &[ValueRecord], fates: &[Fate], extras: usize) -> Vec<ValueRecord> {
    let mut rows = Vec::new();
    for (record, fate) in records.iter().zip(fates) {
        match fate {
            Fate::Drop => {}
            Fate::Keep => rows.push(record.clone()),
            Fate::Rename => {
                let mut stale = record.clone();
                stale.name.push_str("_stale");
                rows.push(stale);
            }
        }
    }
    for i in 0..extras {
        rows.push(ValueRecord::new(1000 + i as i64, format!("Extra{i}")));
    }
    rows
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn matching_store_reconciles_and_verifies_clean(records in arb_records()) {
        let registry = registry_for(&records);
        let provider = MemoryProvider::new();
        provider.seed(registry.binding::<GeneratedSet>().unwrap(), records.clone());

        let stats = Updater::new(&registry, &provider).update::<GeneratedSet>().unwrap();
        prop_assert_eq!(stats, UpdateStats::default());
        prop_assert!(provider.ops().is_empty());
        prop_assert!(Verifier::new(&registry, &provider)
            .verify::<GeneratedSet>()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn reconcile_applies_exactly_the_diff((records, fates, extras) in arb_scenario()) {
        let registry = registry_for(&records);
        let provider = MemoryProvider::new();
        provider.seed(
            registry.binding::<GeneratedSet>().unwrap(),
            store_rows(&records, &fates, extras),
        );

        let updater = Updater::new(&registry, &provider);
        let result = updater.update::<GeneratedSet>();

        if extras > 0 {
            prop_assert!(result.is_err());
            prop_assert!(provider.ops().is_empty());
        } else {
            let dropped = fates.iter().filter(|f| **f == Fate::Drop).count();
            let renamed = fates.iter().filter(|f| **f == Fate::Rename).count();
            let stats = result.unwrap();
            prop_assert_eq!(stats, UpdateStats { add_count: dropped, update_count: renamed });
            prop_assert_eq!(provider.ops().len(), dropped + renamed);

            // A second run has nothing left to do.
            prop_assert_eq!(updater.update::<GeneratedSet>().unwrap(), UpdateStats::default());

            // Every catalog record is now in the store, matched by key.
            let rows = provider.rows(registry.binding::<GeneratedSet>().unwrap());
            prop_assert_eq!(rows.len(), records.len());
            for record in &records {
                prop_assert!(rows.iter().any(|r| r.same_entry(record)));
            }
        }
    }

    #[test]
    fn verify_never_mutates_and_collapses_count_drift((records, fates, extras) in arb_scenario()) {
        let registry = registry_for(&records);
        let provider = MemoryProvider::new();
        let rows = store_rows(&records, &fates, extras);
        provider.seed(registry.binding::<GeneratedSet>().unwrap(), rows.clone());

        let messages = Verifier::new(&registry, &provider).verify::<GeneratedSet>().unwrap();
        prop_assert!(provider.ops().is_empty());
        if rows.len() != records.len() {
            prop_assert_eq!(messages.len(), 1);
        }
    }
}
