use farmer_search_shared::Farmer;

/// Filters search results by the requested feature tags.
///
/// This is the hook where feature matching belongs. It runs after distances
/// have been attached, so an implementation sees fully joined farmers.
pub trait FeatureFilter: Send + Sync {
    fn apply(&self, farmers: Vec<Farmer>, requested: &[String]) -> Vec<Farmer>;
}

/// Accepts the requested features and returns every farmer unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreFeatures;

impl FeatureFilter for IgnoreFeatures {
    fn apply(&self, farmers: Vec<Farmer>, _requested: &[String]) -> Vec<Farmer> {
        farmers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmer_search_shared::GeoLocation;

    #[test]
    fn test_ignore_features_keeps_everything() {
        let farmers = vec![
            Farmer::new("A", GeoLocation::new(0.0, 0.0)),
            Farmer::new("B", GeoLocation::new(1.0, 1.0)),
        ];
        let kept = IgnoreFeatures.apply(farmers.clone(), &["organic".to_string()]);
        assert_eq!(kept, farmers);
    }
}
