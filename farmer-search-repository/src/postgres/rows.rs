//! Row types mapping the `farmers` and `products` tables onto the shared model.

use farmer_search_shared::{Address, Farmer, GeoLocation, OpeningHours, Price, Product};
use sqlx::types::Json;
use uuid::Uuid;

/// Column list selected for every farmer query, in `FarmerRow` order.
pub(crate) const FARMER_COLUMNS: &str = "id, name, rating, grocery_types, title_image, \
     street, number, city, zip_code, country, longitude, latitude, features, opening_hours";

/// Column list selected for every product query, in `ProductRow` order.
pub(crate) const PRODUCT_COLUMNS: &str =
    "id, farmer_id, name, grocery_type, description, price_value, price_unit, title_image";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct FarmerRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub rating: Option<f32>,
    pub grocery_types: Vec<String>,
    pub title_image: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub features: Vec<String>,
    pub opening_hours: Json<OpeningHours>,
}

impl From<FarmerRow> for Farmer {
    fn from(row: FarmerRow) -> Self {
        Farmer {
            key: Some(row.id),
            id: None,
            name: row.name,
            rating: row.rating,
            grocery_types: row.grocery_types,
            title_image: row.title_image,
            address: Address {
                street: row.street,
                number: row.number,
                city: row.city,
                zip_code: row.zip_code,
                country: row.country,
            },
            location: GeoLocation::new(row.longitude, row.latitude),
            features: row.features,
            opening_hours: row.opening_hours.0,
            distance_km: None,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub name: Option<String>,
    pub grocery_type: Option<String>,
    pub description: Option<String>,
    pub price_value: Option<f32>,
    pub price_unit: Option<String>,
    pub title_image: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let mut product = Product {
            key: Some(row.id),
            id: None,
            farmer_key: Some(row.farmer_id),
            farmer_id: None,
            name: row.name,
            grocery_type: row.grocery_type,
            description: row.description,
            price: Price {
                value: row.price_value,
                per_unit: row.price_unit,
            },
            title_image: row.title_image,
        };
        product.expose_ids();
        product
    }
}
