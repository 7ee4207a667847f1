//! This module defines the `RecordStore` trait, which provides an interface
//! for the document store holding farmers and their products.

use async_trait::async_trait;
use farmer_search_shared::{Farmer, Product};
use uuid::Uuid;

use crate::errors::RecordStoreError;

/// A trait that defines the interface for interacting with the record store.
///
/// Every call acquires its own connection and releases it before returning,
/// on success and on error alike. There are no retries: a failed connection
/// attempt surfaces immediately.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch farmers whose key is in `keys` and whose grocery types contain
    /// every entry of `grocery_types`.
    ///
    /// An empty `grocery_types` slice disables the type filter. A key that is
    /// not a well-formed store key fails the whole call with
    /// `RecordStoreError::InvalidArgument`; no partial result is returned.
    async fn find_farmers_by_keys_and_types(
        &self,
        keys: &[String],
        grocery_types: &[String],
    ) -> Result<Vec<Farmer>, RecordStoreError>;

    /// Insert a farmer and return it with its store-assigned key.
    ///
    /// Exactly one record must be written; anything else is reported as
    /// `RecordStoreError::WriteCountMismatch`.
    async fn insert_farmer(&self, farmer: Farmer) -> Result<Farmer, RecordStoreError>;

    /// Fetch every product referencing `farmer_key`, with exposed ids set.
    async fn find_products_by_farmer_key(
        &self,
        farmer_key: &Uuid,
    ) -> Result<Vec<Product>, RecordStoreError>;

    /// Insert a batch of products for an existing farmer.
    ///
    /// Caller-supplied keys are discarded and the farmer key is stamped on
    /// every product. The batch is written as a unit: on any failure,
    /// including an unknown farmer or a count mismatch, no product is stored.
    async fn insert_products(
        &self,
        farmer_key: &Uuid,
        products: Vec<Product>,
    ) -> Result<Vec<Product>, RecordStoreError>;

    /// Add `grocery_types` to the farmer's grocery-type set.
    ///
    /// Set union: types already present are not duplicated, so repeating the
    /// call has no further effect. Fails with `RecordStoreError::FarmerNotFound`
    /// if the key does not resolve to a farmer.
    async fn union_farmer_grocery_types(
        &self,
        farmer_key: &Uuid,
        grocery_types: &[String],
    ) -> Result<(), RecordStoreError>;
}
