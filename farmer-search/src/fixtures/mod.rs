//! Seed fixtures.
//!
//! A fixture is a JSON array of farmers, each optionally carrying the
//! products to add once the farmer exists:
//!
//! ```json
//! [{ "name": "Jeru", "location": { "longitude": 13.37, "latitude": 52.41 },
//!    "products": [{ "name": "Leeks", "groceryType": "Leek" }] }]
//! ```

use std::path::Path;

use farmer_search_shared::{Farmer, Product};
use serde::Deserialize;
use tracing::{error, info};

use crate::catalog::CatalogManager;
use crate::FarmerSearchError;

/// One farmer of a fixture file with its products.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureEntry {
    #[serde(flatten)]
    pub farmer: Farmer,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// What a seeding run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub farmers: usize,
    pub products: usize,
}

pub fn parse_fixture(json: &str) -> Result<Vec<FixtureEntry>, FarmerSearchError> {
    serde_json::from_str(json)
        .map_err(|e| FarmerSearchError::fixture(format!("Invalid fixture: {}", e)))
}

pub async fn load_fixture(path: &Path) -> Result<Vec<FixtureEntry>, FarmerSearchError> {
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        FarmerSearchError::fixture(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_fixture(&json)
}

/// Add every fixture farmer and then its products, in file order.
///
/// Stops at the first failure; farmers seeded before it stay in place.
pub async fn seed(
    catalog: &CatalogManager,
    entries: Vec<FixtureEntry>,
) -> Result<SeedSummary, FarmerSearchError> {
    let mut summary = SeedSummary::default();

    for entry in entries {
        let farmer = catalog.add_farmer(entry.farmer).await.map_err(|e| {
            error!(error = %e, "Failed to seed farmer");
            e
        })?;
        summary.farmers += 1;

        let farmer_id = match farmer.id.as_deref() {
            Some(id) => id,
            None => {
                return Err(FarmerSearchError::fixture(
                    "seeded farmer has no exposed id",
                ))
            }
        };

        if !entry.products.is_empty() {
            let products = catalog
                .add_products(farmer_id, entry.products)
                .await
                .map_err(|e| {
                    error!(farmer_id = %farmer_id, error = %e, "Failed to seed products");
                    e
                })?;
            summary.products += products.len();
        }

        info!(farmer_id = %farmer_id, name = ?farmer.name, "Seeded farmer");
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixture_with_products() {
        let entries = parse_fixture(
            r#"[
                {
                    "name": "Jeru",
                    "rating": 4.3,
                    "location": { "longitude": 13.3777, "latitude": 52.4125 },
                    "products": [{ "name": "Leeks", "groceryType": "Leek" }]
                },
                {
                    "name": "Sarah Vaughan and Clifford Brown",
                    "location": { "longitude": 13.0645, "latitude": 52.3906 }
                }
            ]"#,
        )
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].farmer.name.as_deref(), Some("Jeru"));
        assert_eq!(entries[0].farmer.rating, Some(4.3));
        assert_eq!(entries[0].products[0].grocery_type.as_deref(), Some("Leek"));
        assert!(entries[1].products.is_empty());
    }

    #[test]
    fn test_parse_fixture_requires_location() {
        let result = parse_fixture(r#"[{ "name": "Nowhere" }]"#);
        assert!(matches!(result, Err(FarmerSearchError::FixtureError(_))));
    }

    #[test]
    fn test_bundled_fixture_is_valid() {
        let json = include_str!("../../fixtures/farmers.json");
        let entries = parse_fixture(json).unwrap();

        assert_eq!(entries.len(), 3);
        for entry in &entries {
            assert!(entry.farmer.validate().is_ok());
        }
    }
}
