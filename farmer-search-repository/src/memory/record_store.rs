use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use farmer_search_shared::{Farmer, Product};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::errors::RecordStoreError;
use crate::interfaces::RecordStore;
use crate::utils::parse_store_keys;

/// Operations of the in-memory record store that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    FindFarmers,
    InsertFarmer,
    FindProducts,
    InsertProducts,
    UnionGroceryTypes,
}

#[derive(Default)]
struct Records {
    farmers: Vec<Farmer>,
    products: Vec<Product>,
}

/// Record store keeping farmers and products in insertion order.
pub struct InMemoryRecordStore {
    records: Mutex<Records>,
    failing: Mutex<HashSet<StoreOperation>>,
    find_farmer_calls: AtomicUsize,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Records::default()),
            failing: Mutex::new(HashSet::new()),
            find_farmer_calls: AtomicUsize::new(0),
        }
    }

    /// Make `operation` fail with a connection error until reset.
    pub async fn set_failing(&self, operation: StoreOperation, failing: bool) {
        let mut ops = self.failing.lock().await;
        if failing {
            ops.insert(operation);
        } else {
            ops.remove(&operation);
        }
    }

    /// Number of farmer lookups received.
    pub fn find_farmer_calls(&self) -> usize {
        self.find_farmer_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of every stored farmer.
    pub async fn farmers(&self) -> Vec<Farmer> {
        self.records.lock().await.farmers.clone()
    }

    /// Snapshot of every stored product.
    pub async fn products(&self) -> Vec<Product> {
        self.records.lock().await.products.clone()
    }

    pub async fn farmer(&self, key: &Uuid) -> Option<Farmer> {
        self.records
            .lock()
            .await
            .farmers
            .iter()
            .find(|f| f.key.as_ref() == Some(key))
            .cloned()
    }

    async fn check(&self, operation: StoreOperation) -> Result<(), RecordStoreError> {
        if self.failing.lock().await.contains(&operation) {
            return Err(RecordStoreError::connection(format!(
                "in-memory record store is unavailable for {:?}",
                operation
            )));
        }
        Ok(())
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_farmers_by_keys_and_types(
        &self,
        keys: &[String],
        grocery_types: &[String],
    ) -> Result<Vec<Farmer>, RecordStoreError> {
        self.find_farmer_calls.fetch_add(1, Ordering::SeqCst);
        self.check(StoreOperation::FindFarmers).await?;
        let keys: HashSet<Uuid> = parse_store_keys(keys)?.into_iter().collect();

        let records = self.records.lock().await;
        let farmers: Vec<Farmer> = records
            .farmers
            .iter()
            .filter(|f| f.key.map_or(false, |key| keys.contains(&key)))
            .filter(|f| f.has_grocery_types(grocery_types))
            .cloned()
            .collect();

        debug!(matched = farmers.len(), "In-memory farmer lookup");
        Ok(farmers)
    }

    async fn insert_farmer(&self, mut farmer: Farmer) -> Result<Farmer, RecordStoreError> {
        self.check(StoreOperation::InsertFarmer).await?;

        farmer.key = Some(Uuid::new_v4());
        farmer.id = None;
        self.records.lock().await.farmers.push(farmer.clone());
        Ok(farmer)
    }

    async fn find_products_by_farmer_key(
        &self,
        farmer_key: &Uuid,
    ) -> Result<Vec<Product>, RecordStoreError> {
        self.check(StoreOperation::FindProducts).await?;

        let records = self.records.lock().await;
        Ok(records
            .products
            .iter()
            .filter(|p| p.farmer_key.as_ref() == Some(farmer_key))
            .cloned()
            .map(|mut p| {
                p.expose_ids();
                p
            })
            .collect())
    }

    async fn insert_products(
        &self,
        farmer_key: &Uuid,
        mut products: Vec<Product>,
    ) -> Result<Vec<Product>, RecordStoreError> {
        self.check(StoreOperation::InsertProducts).await?;

        let mut records = self.records.lock().await;
        if !records.farmers.iter().any(|f| f.key.as_ref() == Some(farmer_key)) {
            return Err(RecordStoreError::FarmerNotFound(*farmer_key));
        }

        for product in products.iter_mut() {
            product.key = Some(Uuid::new_v4());
            product.farmer_key = Some(*farmer_key);
            product.id = None;
            product.farmer_id = None;
        }
        records.products.extend(products.iter().cloned());

        for product in products.iter_mut() {
            product.expose_ids();
        }
        Ok(products)
    }

    async fn union_farmer_grocery_types(
        &self,
        farmer_key: &Uuid,
        grocery_types: &[String],
    ) -> Result<(), RecordStoreError> {
        self.check(StoreOperation::UnionGroceryTypes).await?;

        let mut records = self.records.lock().await;
        let farmer = records
            .farmers
            .iter_mut()
            .find(|f| f.key.as_ref() == Some(farmer_key))
            .ok_or(RecordStoreError::FarmerNotFound(*farmer_key))?;

        farmer.grocery_types.extend(grocery_types.iter().cloned());
        farmer.grocery_types.sort();
        farmer.grocery_types.dedup();
        Ok(())
    }
}
