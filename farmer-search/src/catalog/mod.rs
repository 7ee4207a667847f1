//! Catalog consistency manager.
//!
//! Owns the two mutations that touch more than one place: registering a
//! farmer (record store, then geo index) and adding products (product batch,
//! then the farmer's grocery-type aggregate). Neither is transactional and
//! nothing is compensated. A failure after the first write comes back as
//! `CatalogError::IncompleteMutation` naming the step that failed.

use std::sync::Arc;

use farmer_search_repository::{GeoIndexProvider, RecordStore};
use farmer_search_shared::{decode_id, distinct_grocery_types, Farmer, Product, RecordKind};
use tracing::{info, instrument};

use crate::errors::CatalogError;
use crate::saga::{SagaCursor, SagaKind, SagaStep};

/// Keeps the record store, the geo index and the grocery-type aggregate in
/// step as farmers and products are added.
pub struct CatalogManager {
    geo_index: Arc<dyn GeoIndexProvider>,
    records: Arc<dyn RecordStore>,
}

impl CatalogManager {
    pub fn new(geo_index: Arc<dyn GeoIndexProvider>, records: Arc<dyn RecordStore>) -> Self {
        Self { geo_index, records }
    }

    /// Register a new farmer.
    ///
    /// Caller-supplied key, id and distance are discarded. The farmer is
    /// inserted into the record store, then its location is registered in the
    /// geo index under the new key.
    ///
    /// # Returns
    ///
    /// * `Ok(Farmer)` - The stored farmer with `key` and `id` set
    /// * `Err(CatalogError::InvalidArgument)` - The farmer failed validation;
    ///   nothing was written
    /// * `Err(CatalogError::Store)` - The insert failed; nothing was written
    /// * `Err(CatalogError::IncompleteMutation)` - The farmer was stored but
    ///   the geo index rejected the point, so search cannot find it
    #[instrument(skip(self, farmer), fields(name = ?farmer.name))]
    pub async fn add_farmer(&self, mut farmer: Farmer) -> Result<Farmer, CatalogError> {
        farmer.clear_store_fields();
        farmer.normalize_sets();
        farmer.validate()?;

        let mut saga = SagaCursor::begin(SagaKind::AddFarmer);

        let mut farmer = match self.records.insert_farmer(farmer).await {
            Ok(farmer) => farmer,
            Err(e) => return Err(saga.fail(SagaStep::InsertFarmerRecord, e.into())),
        };
        let key = farmer.key.ok_or_else(|| {
            CatalogError::internal_inconsistency("record store did not assign a farmer key")
        })?;
        saga.bind_farmer(key);
        saga.complete(SagaStep::InsertFarmerRecord);

        if let Err(e) = self.geo_index.register_point(&key, farmer.location).await {
            return Err(saga.fail(SagaStep::RegisterGeoPoint, e.into()));
        }
        saga.complete(SagaStep::RegisterGeoPoint);
        saga.finish();

        farmer.expose_id();
        info!(id = ?farmer.id, "Farmer added");
        Ok(farmer)
    }

    /// Add a batch of products to an existing farmer.
    ///
    /// The batch is inserted as a unit, then the distinct grocery types of
    /// the inserted products are merged into the farmer's grocery-type set.
    ///
    /// # Arguments
    ///
    /// * `farmer_id` - Exposed farmer identifier (`f<key>`)
    /// * `products` - Non-empty batch; caller-supplied ids are discarded
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Product>)` - The stored products with `id` and `farmerId` set
    /// * `Err(CatalogError::InvalidArgument)` - Malformed farmer id or empty batch
    /// * `Err(CatalogError::Store)` - The insert failed (including an unknown
    ///   farmer); no product was written and the aggregate is untouched
    /// * `Err(CatalogError::IncompleteMutation)` - The products were stored but
    ///   their grocery types were not merged into the farmer
    #[instrument(skip(self, products), fields(product_count = products.len()))]
    pub async fn add_products(
        &self,
        farmer_id: &str,
        products: Vec<Product>,
    ) -> Result<Vec<Product>, CatalogError> {
        let farmer_key = decode_id(RecordKind::Farmer, farmer_id)?;
        if products.is_empty() {
            return Err(CatalogError::invalid_argument(
                "at least one product is required",
            ));
        }

        let mut saga = SagaCursor::begin(SagaKind::AddProducts);
        saga.bind_farmer(farmer_key);

        let inserted = match self.records.insert_products(&farmer_key, products).await {
            Ok(inserted) => inserted,
            Err(e) => return Err(saga.fail(SagaStep::InsertProducts, e.into())),
        };
        saga.complete(SagaStep::InsertProducts);

        let grocery_types = distinct_grocery_types(&inserted);
        if let Err(e) = self
            .records
            .union_farmer_grocery_types(&farmer_key, &grocery_types)
            .await
        {
            return Err(saga.fail(SagaStep::MergeGroceryTypes, e.into()));
        }
        saga.complete(SagaStep::MergeGroceryTypes);
        saga.finish();

        info!(
            farmer_id = %farmer_id,
            inserted = inserted.len(),
            grocery_types = ?grocery_types,
            "Products added"
        );
        Ok(inserted)
    }

    /// List every product of a farmer.
    #[instrument(skip(self))]
    pub async fn list_products(&self, farmer_id: &str) -> Result<Vec<Product>, CatalogError> {
        let farmer_key = decode_id(RecordKind::Farmer, farmer_id)?;
        Ok(self.records.find_products_by_farmer_key(&farmer_key).await?)
    }
}
