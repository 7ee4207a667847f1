//! Farmer record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;
use crate::ids::{encode_id, RecordKind};
use crate::types::location::{Address, GeoLocation};
use crate::types::opening_hours::OpeningHours;

/// Highest rating a farmer can carry.
pub const MAX_RATING: f32 = 5.0;

/// A supplier that can be found by proximity search.
///
/// The store key is assigned by the record store and never serialized. The
/// exposed `id` is derived from it with the identifier codec whenever a
/// farmer leaves the system; it is never persisted. `distance_km` only exists
/// on search results.
///
/// `grocery_types` has set semantics: it is the union of the grocery types of
/// the farmer's products, maintained on every product insertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Farmer {
    #[serde(skip)]
    pub key: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grocery_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_image: Option<String>,
    #[serde(default, skip_serializing_if = "Address::is_empty")]
    pub address: Address,
    pub location: GeoLocation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(
        default,
        rename = "openingHoursByDayOfWeek_secondsFromStartOfDay",
        skip_serializing_if = "OpeningHours::is_empty"
    )]
    pub opening_hours: OpeningHours,
    #[serde(
        default,
        rename = "distance_km",
        skip_serializing_if = "Option::is_none"
    )]
    pub distance_km: Option<f64>,
}

impl Farmer {
    /// Create a farmer with a name and location and nothing else.
    pub fn new(name: impl Into<String>, location: GeoLocation) -> Self {
        Self {
            name: Some(name.into()),
            location,
            ..Default::default()
        }
    }

    /// Drop everything a caller may not set on creation: the store key, the
    /// exposed id, and the computed distance.
    pub fn clear_store_fields(&mut self) {
        self.key = None;
        self.id = None;
        self.distance_km = None;
    }

    /// Set the exposed identifier from the store key, if one is assigned.
    pub fn expose_id(&mut self) {
        self.id = self.key.map(|key| encode_id(RecordKind::Farmer, &key));
    }

    /// Collapse `grocery_types` and `features` to sorted sets.
    pub fn normalize_sets(&mut self) {
        self.grocery_types.sort();
        self.grocery_types.dedup();
        self.features.sort();
        self.features.dedup();
    }

    pub fn has_grocery_types(&self, required: &[String]) -> bool {
        required.iter().all(|t| self.grocery_types.contains(t))
    }

    /// Check the rules a farmer must satisfy before it is written anywhere.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(rating) = self.rating {
            if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
                return Err(ValidationError::new(format!(
                    "rating must be within [0, {}], got {}",
                    MAX_RATING, rating
                )));
            }
        }
        self.location.validate()?;
        self.opening_hours.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_farmer() -> Farmer {
        Farmer {
            rating: Some(4.6),
            grocery_types: vec!["Strawberry".to_string(), "Potato".to_string()],
            title_image: Some("/img/2l092834lskhsieo.svg".to_string()),
            opening_hours: OpeningHours::every_day(vec![[9 * 3600, 17 * 3600]]),
            ..Farmer::new("The local Farm <3", GeoLocation::new(13.4, 52.5))
        }
    }

    #[test]
    fn test_key_is_never_serialized() {
        let mut farmer = test_farmer();
        farmer.key = Some(Uuid::new_v4());

        let json = serde_json::to_value(&farmer).unwrap();
        assert!(json.get("key").is_none());
        assert!(json.get("id").is_none());
        assert!(json.get("distance_km").is_none());
    }

    #[test]
    fn test_external_field_names() {
        let mut farmer = test_farmer();
        farmer.key = Some(Uuid::new_v4());
        farmer.expose_id();
        farmer.distance_km = Some(1.5);

        let json = serde_json::to_value(&farmer).unwrap();
        assert!(json["id"].as_str().unwrap().starts_with('f'));
        assert_eq!(json["groceryTypes"][0], "Strawberry");
        assert_eq!(json["titleImage"], "/img/2l092834lskhsieo.svg");
        assert_eq!(json["distance_km"], 1.5);
        assert!(json["openingHoursByDayOfWeek_secondsFromStartOfDay"]["Monday"].is_array());
        assert!(json.get("address").is_none());
        assert!(json.get("features").is_none());
    }

    #[test]
    fn test_deserialize_minimal() {
        let farmer: Farmer = serde_json::from_str(
            r#"{ "name": "Jeru", "rating": 4.3, "location": { "longitude": 8.68, "latitude": 50.11 } }"#,
        )
        .unwrap();

        assert_eq!(farmer.name.as_deref(), Some("Jeru"));
        assert!(farmer.key.is_none());
        assert!(farmer.grocery_types.is_empty());
        assert!(farmer.validate().is_ok());
    }

    #[test]
    fn test_clear_store_fields() {
        let mut farmer = test_farmer();
        farmer.key = Some(Uuid::new_v4());
        farmer.expose_id();
        farmer.distance_km = Some(3.0);

        farmer.clear_store_fields();
        assert!(farmer.key.is_none());
        assert!(farmer.id.is_none());
        assert!(farmer.distance_km.is_none());
    }

    #[test]
    fn test_has_grocery_types_is_subset_match() {
        let farmer = test_farmer();
        assert!(farmer.has_grocery_types(&[]));
        assert!(farmer.has_grocery_types(&["Potato".to_string()]));
        assert!(farmer.has_grocery_types(&["Potato".to_string(), "Strawberry".to_string()]));
        assert!(!farmer.has_grocery_types(&["Potato".to_string(), "Kale".to_string()]));
    }

    #[test]
    fn test_validate_rating() {
        let mut farmer = test_farmer();
        farmer.rating = Some(5.5);
        assert!(farmer.validate().is_err());
        farmer.rating = Some(-0.1);
        assert!(farmer.validate().is_err());
        farmer.rating = None;
        assert!(farmer.validate().is_ok());
    }

    #[test]
    fn test_normalize_sets() {
        let mut farmer = test_farmer();
        farmer.grocery_types.push("Potato".to_string());
        farmer.normalize_sets();
        assert_eq!(farmer.grocery_types, vec!["Potato", "Strawberry"]);
    }
}
