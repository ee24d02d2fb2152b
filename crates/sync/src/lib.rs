//! `refdata-sync` — verification and reconciliation of enumeration
//! catalogs against a store.
//!
//! Pure sync crate: receives a registry and a provider, reports or applies
//! differences. No storage dependencies; providers come from the caller.

pub mod updater;
pub mod verifier;

pub use updater::{UpdateStats, Updater};
pub use verifier::Verifier;
