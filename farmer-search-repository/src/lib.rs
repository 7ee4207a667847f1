//! # Farmer Search Repository
//!
//! This crate provides the gateways to the two stores behind the farmer
//! proximity search: the geospatial index that answers radius queries and the
//! record store that holds farmers and their products. It includes the
//! provider traits, their error types, a Kinetica geo-index provider, a
//! PostgreSQL record store, and in-memory implementations of both.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod kinetica;
pub mod memory;
pub mod postgres;
pub mod utils;

pub use config::{GeoIndexConfig, RecordStoreConfig};
pub use errors::{GeoIndexError, RecordStoreError};
pub use interfaces::{GeoIndexProvider, RecordStore};
pub use kinetica::KineticaProvider;
pub use memory::{GeoOperation, InMemoryGeoIndex, InMemoryRecordStore, StoreOperation};
pub use postgres::PostgresRecordStore;
pub use utils::{haversine_distance_m, parse_store_keys, validate_radius};
