//! Interface definitions for the two external stores.
//!
//! This module defines the abstract `GeoIndexProvider` and `RecordStore`
//! traits that allow for dependency injection and swappable backends.

mod geo_index_provider;
mod record_store;

pub use geo_index_provider::GeoIndexProvider;
pub use record_store::RecordStore;
