//! In-memory gateway implementations.
//!
//! Both stores keep everything in process and honour the same contracts as
//! the Kinetica and PostgreSQL backends: radius validation and the row cap on
//! the geo side; subset filtering, key validation, atomic product batches and
//! set-union updates on the record side. They count calls and can be told to
//! fail individual operations, which makes them suitable for local runs of
//! the seeder and for exercising the engine and catalog manager in tests.

mod geo_index;
mod record_store;

pub use geo_index::{GeoOperation, InMemoryGeoIndex};
pub use record_store::{InMemoryRecordStore, StoreOperation};
