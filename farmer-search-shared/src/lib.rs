//! # Farmer Search Shared
//!
//! This crate defines the data model shared across the farmer search system:
//! farmers, their products, and the value objects embedded in them. It also
//! provides the identifier codec used to translate store keys into the
//! kind-tagged identifiers exposed to clients.

pub mod errors;
pub mod ids;
pub mod types;

pub use errors::{IdError, ValidationError};
pub use ids::{decode_id, encode_id, parse_store_key, store_key_string, RecordKind};
pub use types::{
    distinct_grocery_types, Address, Farmer, GeoLocation, OpeningHours, Price, Product,
};
