//! This module defines the core data structures of the farmer search system.
//! It re-exports the farmer and product records along with their embedded
//! value objects.

pub mod farmer;
pub mod location;
pub mod opening_hours;
pub mod product;

pub use farmer::Farmer;
pub use location::{Address, GeoLocation};
pub use opening_hours::OpeningHours;
pub use product::{distinct_grocery_types, Price, Product};
