//! PostgreSQL implementation of the record store.
//!
//! Farmers and products live in two tables; the farmer's grocery-type set is
//! a `TEXT[]` column so that subset filtering maps onto the `@>` operator.
//! Schema changes are kept in `migrations/` and applied with
//! [`PostgresRecordStore::migrate`].

mod record_store;
mod rows;

pub use record_store::PostgresRecordStore;
