//! `refdata-core` — catalogs, bindings and provider traits for
//! reference-data reconciliation.
//!
//! A fixed, compile-time set of named records (an enumeration) is the
//! source of truth; providers expose what a store currently holds so the
//! sync layer can report or repair drift. Pure types crate: no IO.

pub mod binding;
pub mod catalog;
pub mod error;
pub mod pluralize;
pub mod provider;
pub mod record;
pub mod registry;

pub use binding::TableBinding;
pub use catalog::Catalog;
pub use error::RefdataError;
pub use provider::{UpdateProvider, ValueProvider};
pub use record::{PropertyValue, ValueRecord};
pub use registry::{Enumeration, Registration, Registry};
