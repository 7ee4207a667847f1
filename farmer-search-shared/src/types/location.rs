//! Value objects describing where a farmer is.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct GeoLocation {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoLocation {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Check that both coordinates are finite and inside their WGS84 ranges.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ValidationError::new(format!(
                "longitude must be within [-180, 180], got {}",
                self.longitude
            )));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ValidationError::new(format!(
                "latitude must be within [-90, 90], got {}",
                self.latitude
            )));
        }
        Ok(())
    }
}

/// Postal address of a farmer. Every part is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.number.is_none()
            && self.city.is_none()
            && self.zip_code.is_none()
            && self.country.is_none()
    }
}
