//! Product record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::{encode_id, RecordKind};

/// Price of a product per unit, e.g. `2.5` per `kg`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_unit: Option<String>,
}

impl Price {
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.per_unit.is_none()
    }
}

/// A catalog entry offered by a farmer.
///
/// `farmer_key` is a back-reference to the owning farmer, not ownership: a
/// product is never created without an existing farmer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(skip)]
    pub key: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip)]
    pub farmer_key: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farmer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grocery_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Price::is_empty")]
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_image: Option<String>,
}

impl Product {
    pub fn new(name: impl Into<String>, grocery_type: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            grocery_type: Some(grocery_type.into()),
            ..Default::default()
        }
    }

    /// Set the exposed product and farmer identifiers from the store keys.
    pub fn expose_ids(&mut self) {
        self.id = self.key.map(|key| encode_id(RecordKind::Product, &key));
        self.farmer_id = self
            .farmer_key
            .map(|key| encode_id(RecordKind::Farmer, &key));
    }
}

/// Distinct grocery types of a product batch, in first-seen order.
pub fn distinct_grocery_types(products: &[Product]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for grocery_type in products.iter().filter_map(|p| p.grocery_type.as_ref()) {
        if !grocery_type.is_empty() && !types.contains(grocery_type) {
            types.push(grocery_type.clone());
        }
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::decode_id;

    #[test]
    fn test_expose_ids() {
        let mut product = Product::new("Curly kale", "Kale");
        let key = Uuid::new_v4();
        let farmer_key = Uuid::new_v4();
        product.key = Some(key);
        product.farmer_key = Some(farmer_key);

        product.expose_ids();

        assert_eq!(decode_id(RecordKind::Product, product.id.as_ref().unwrap()).unwrap(), key);
        assert_eq!(
            decode_id(RecordKind::Farmer, product.farmer_id.as_ref().unwrap()).unwrap(),
            farmer_key
        );
    }

    #[test]
    fn test_serialization_hides_keys() {
        let mut product = Product::new("Leek", "Leek");
        product.key = Some(Uuid::new_v4());
        product.farmer_key = Some(Uuid::new_v4());
        product.price = Price {
            value: Some(2.5),
            per_unit: Some("kg".to_string()),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("key").is_none());
        assert!(json.get("farmerKey").is_none());
        assert_eq!(json["groceryType"], "Leek");
        assert_eq!(json["price"]["perUnit"], "kg");
    }

    #[test]
    fn test_distinct_grocery_types() {
        let products = vec![
            Product::new("Curly kale", "Kale"),
            Product::new("Leek", "Leek"),
            Product::new("Red kale", "Kale"),
            Product::default(),
        ];
        assert_eq!(distinct_grocery_types(&products), vec!["Kale", "Leek"]);
    }
}
