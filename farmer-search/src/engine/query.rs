use farmer_search_shared::GeoLocation;

/// Search radius applied when the caller does not give one.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;

/// A proximity search: every farmer within `max_distance_km` of `point`
/// that offers all of `grocery_types`.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub point: GeoLocation,
    pub max_distance_km: f64,
    /// Required grocery types. Empty means no type filter.
    pub grocery_types: Vec<String>,
    /// Requested feature tags, handed to the engine's `FeatureFilter`.
    pub features: Vec<String>,
}

impl NearbyQuery {
    pub fn new(point: GeoLocation) -> Self {
        Self {
            point,
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            grocery_types: Vec::new(),
            features: Vec::new(),
        }
    }

    pub fn with_max_distance_km(mut self, max_distance_km: f64) -> Self {
        self.max_distance_km = max_distance_km;
        self
    }

    pub fn with_grocery_types<I, S>(mut self, grocery_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grocery_types = grocery_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }
}

/// Order of the farmers returned by a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultOrder {
    /// Whatever order the record store returns.
    #[default]
    Unordered,
    /// Ascending by distance to the query point.
    NearestFirst,
}

impl ResultOrder {
    /// Parse `unordered` or `nearest-first` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "unordered" => Some(Self::Unordered),
            "nearest-first" | "nearest_first" | "nearestfirst" => Some(Self::NearestFirst),
            _ => None,
        }
    }
}
