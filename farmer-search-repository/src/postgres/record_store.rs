//! PostgreSQL record store.
//!
//! Every operation acquires a pooled connection (or a transaction on one) for
//! the duration of the call only. The connection goes back to the pool when
//! the guard is dropped, which happens on every exit path including early
//! returns through `?`.

use std::str::FromStr;

use async_trait::async_trait;
use farmer_search_shared::{Farmer, Product};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::RecordStoreConfig;
use crate::errors::RecordStoreError;
use crate::interfaces::RecordStore;
use crate::postgres::rows::{FarmerRow, ProductRow, FARMER_COLUMNS, PRODUCT_COLUMNS};
use crate::utils::parse_store_keys;

/// PostgreSQL implementation of the record store.
///
/// ## Tables
///
/// - `farmers`: one row per farmer, grocery types and features as `TEXT[]`,
///   opening hours as `JSONB`
/// - `products`: one row per product, `farmer_id` references `farmers(id)`
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Wrap an existing pool.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with the required schema
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a store whose connections are opened on first use.
    ///
    /// Waiting for a connection is bounded by `config.connect_timeout`; when it
    /// elapses the call fails instead of retrying.
    pub fn connect_lazy(config: &RecordStoreConfig) -> Result<Self, RecordStoreError> {
        let options = PgConnectOptions::from_str(&config.database_url)
            .map_err(|e| RecordStoreError::connection(format!("Invalid DATABASE_URL: {}", e)))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(0)
            .acquire_timeout(config.connect_timeout)
            .connect_lazy_with(options);

        info!(
            connect_timeout_secs = config.connect_timeout.as_secs(),
            max_connections = config.max_connections,
            "Created PostgreSQL record store"
        );

        Ok(Self { pool })
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), RecordStoreError> {
        sqlx::migrate!("src/postgres/migrations")
            .run(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    #[instrument(skip(self, keys), fields(key_count = keys.len()))]
    async fn find_farmers_by_keys_and_types(
        &self,
        keys: &[String],
        grocery_types: &[String],
    ) -> Result<Vec<Farmer>, RecordStoreError> {
        let keys = parse_store_keys(keys)?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM farmers WHERE id = ANY(",
            FARMER_COLUMNS
        ));
        query_builder.push_bind(keys).push(")");

        if !grocery_types.is_empty() {
            query_builder
                .push(" AND grocery_types @> ")
                .push_bind(grocery_types.to_vec());
        }

        let mut conn = self.pool.acquire().await?;
        let rows: Vec<FarmerRow> = query_builder
            .build_query_as()
            .fetch_all(&mut *conn)
            .await?;

        debug!(matched = rows.len(), "Fetched farmers by keys and grocery types");
        Ok(rows.into_iter().map(Farmer::from).collect())
    }

    #[instrument(skip(self, farmer), fields(name = ?farmer.name))]
    async fn insert_farmer(&self, mut farmer: Farmer) -> Result<Farmer, RecordStoreError> {
        let mut conn = self.pool.acquire().await?;

        let inserted: Vec<Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO farmers (
                name, rating, grocery_types, title_image,
                street, number, city, zip_code, country,
                longitude, latitude, features, opening_hours
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(farmer.name.clone())
        .bind(farmer.rating)
        .bind(farmer.grocery_types.clone())
        .bind(farmer.title_image.clone())
        .bind(farmer.address.street.clone())
        .bind(farmer.address.number.clone())
        .bind(farmer.address.city.clone())
        .bind(farmer.address.zip_code.clone())
        .bind(farmer.address.country.clone())
        .bind(farmer.location.longitude)
        .bind(farmer.location.latitude)
        .bind(farmer.features.clone())
        .bind(Json(farmer.opening_hours.clone()))
        .fetch_all(&mut *conn)
        .await?;

        if inserted.len() != 1 {
            return Err(RecordStoreError::write_count_mismatch(1, inserted.len()));
        }

        farmer.key = Some(inserted[0]);
        info!(key = %inserted[0], "Inserted farmer");
        Ok(farmer)
    }

    async fn find_products_by_farmer_key(
        &self,
        farmer_key: &Uuid,
    ) -> Result<Vec<Product>, RecordStoreError> {
        let sql = format!(
            "SELECT {} FROM products WHERE farmer_id = $1 ORDER BY created_at, id",
            PRODUCT_COLUMNS
        );

        let mut conn = self.pool.acquire().await?;
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(farmer_key)
            .fetch_all(&mut *conn)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self, products), fields(farmer_key = %farmer_key, product_count = products.len()))]
    async fn insert_products(
        &self,
        farmer_key: &Uuid,
        mut products: Vec<Product>,
    ) -> Result<Vec<Product>, RecordStoreError> {
        // Dropping the transaction without commit rolls it back, so every
        // early return below leaves the products table untouched.
        let mut tx = self.pool.begin().await?;

        let farmer_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM farmers WHERE id = $1)")
                .bind(farmer_key)
                .fetch_one(&mut *tx)
                .await?;
        if !farmer_exists {
            warn!("Refusing to insert products for unknown farmer");
            return Err(RecordStoreError::FarmerNotFound(*farmer_key));
        }

        if products.is_empty() {
            return Ok(products);
        }

        for product in products.iter_mut() {
            product.key = Some(Uuid::new_v4());
            product.farmer_key = Some(*farmer_key);
        }

        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO products (id, farmer_id, name, grocery_type, description, price_value, price_unit, title_image) ",
        );
        query_builder.push_values(&products, |mut b, product| {
            b.push_bind(product.key)
                .push_bind(product.farmer_key)
                .push_bind(product.name.clone())
                .push_bind(product.grocery_type.clone())
                .push_bind(product.description.clone())
                .push_bind(product.price.value)
                .push_bind(product.price.per_unit.clone())
                .push_bind(product.title_image.clone());
        });
        query_builder.push(" RETURNING id");

        let inserted: Vec<Uuid> = query_builder
            .build_query_scalar()
            .fetch_all(&mut *tx)
            .await?;

        if inserted.len() != products.len() {
            return Err(RecordStoreError::write_count_mismatch(
                products.len(),
                inserted.len(),
            ));
        }

        tx.commit().await?;

        for product in products.iter_mut() {
            product.expose_ids();
        }

        info!(inserted = inserted.len(), "Inserted products");
        Ok(products)
    }

    #[instrument(skip(self, grocery_types), fields(farmer_key = %farmer_key))]
    async fn union_farmer_grocery_types(
        &self,
        farmer_key: &Uuid,
        grocery_types: &[String],
    ) -> Result<(), RecordStoreError> {
        let mut conn = self.pool.acquire().await?;

        let result = sqlx::query(
            r#"
            UPDATE farmers
            SET grocery_types = ARRAY(
                SELECT DISTINCT t FROM unnest(grocery_types || $2::text[]) AS t ORDER BY t
            )
            WHERE id = $1
            "#,
        )
        .bind(farmer_key)
        .bind(grocery_types.to_vec())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RecordStoreError::FarmerNotFound(*farmer_key));
        }

        debug!(added = ?grocery_types, "Merged grocery types into farmer");
        Ok(())
    }
}
