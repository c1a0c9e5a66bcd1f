//! Borough boundary document
//!
//! The GeoJSON consumed by the choropleth renderer. It is validated at
//! startup and then handed out untouched; nothing in the aggregation path
//! reads it.

use serde_json::Value;
use std::path::Path;

use super::catalog::Borough;
use super::error::{DatasetError, DatasetResult};

/// Default property path holding the borough name of each feature
pub const DEFAULT_FEATURE_ID_KEY: &str = "properties.boro_name";

/// A validated boundary `FeatureCollection`
#[derive(Debug, Clone)]
pub struct BoroughBoundaries {
    document: Value,
    feature_id_key: String,
    /// Borough names found under `feature_id_key`, in document order
    feature_names: Vec<String>,
}

impl BoroughBoundaries {
    /// Load and validate a GeoJSON file
    pub fn load(path: &Path, feature_id_key: &str) -> DatasetResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, feature_id_key)
    }

    /// Parse and validate a GeoJSON document
    pub fn parse(content: &str, feature_id_key: &str) -> DatasetResult<Self> {
        let document: Value = serde_json::from_str(content)?;
        Self::from_value(document, feature_id_key)
    }

    pub fn from_value(document: Value, feature_id_key: &str) -> DatasetResult<Self> {
        if document.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(DatasetError::Boundaries(
                "expected a GeoJSON FeatureCollection".to_string(),
            ));
        }

        let features = document
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| DatasetError::Boundaries("missing 'features' array".to_string()))?;

        let feature_names = features
            .iter()
            .enumerate()
            .map(|(idx, feature)| {
                lookup_path(feature, feature_id_key)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        DatasetError::Boundaries(format!(
                            "feature {} has no string at '{}'",
                            idx, feature_id_key
                        ))
                    })
            })
            .collect::<DatasetResult<Vec<_>>>()?;

        for borough in Borough::ALL {
            if !feature_names.iter().any(|n| Borough::from_name(n) == Some(borough)) {
                tracing::warn!(borough = %borough, "No boundary feature for borough");
            }
        }

        Ok(Self {
            document,
            feature_id_key: feature_id_key.to_string(),
            feature_names,
        })
    }

    /// The document exactly as loaded
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn feature_id_key(&self) -> &str {
        &self.feature_id_key
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Catalog boroughs that have a boundary feature
    pub fn covered_boroughs(&self) -> Vec<Borough> {
        Borough::ALL
            .into_iter()
            .filter(|b| {
                self.feature_names
                    .iter()
                    .any(|n| Borough::from_name(n) == Some(*b))
            })
            .collect()
    }
}

/// Follow a dotted path such as `properties.boro_name`
fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(name: &str) -> Value {
        json!({
            "type": "Feature",
            "properties": { "boro_code": "1", "boro_name": name },
            "geometry": { "type": "Polygon", "coordinates": [] }
        })
    }

    #[test]
    fn test_valid_collection() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [feature("Manhattan"), feature("Bronx")]
        });

        let boundaries = BoroughBoundaries::from_value(doc.clone(), DEFAULT_FEATURE_ID_KEY).unwrap();

        assert_eq!(boundaries.feature_names(), ["Manhattan", "Bronx"]);
        assert_eq!(
            boundaries.covered_boroughs(),
            vec![Borough::Manhattan, Borough::Bronx]
        );
        assert_eq!(boundaries.document(), &doc);
        assert_eq!(boundaries.feature_id_key(), "properties.boro_name");
    }

    #[test]
    fn test_custom_key() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [{ "type": "Feature", "id": "Queens", "properties": {} }]
        });

        let boundaries = BoroughBoundaries::from_value(doc, "id").unwrap();
        assert_eq!(boundaries.covered_boroughs(), vec![Borough::Queens]);
    }

    #[test]
    fn test_rejects_non_collection() {
        let err = BoroughBoundaries::from_value(json!({ "type": "Feature" }), DEFAULT_FEATURE_ID_KEY)
            .unwrap_err();
        assert!(matches!(err, DatasetError::Boundaries(_)));
    }

    #[test]
    fn test_rejects_feature_without_key() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [feature("Manhattan"), { "type": "Feature", "properties": {} }]
        });

        let err = BoroughBoundaries::from_value(doc, DEFAULT_FEATURE_ID_KEY).unwrap_err();
        assert!(err.to_string().contains("feature 1"));
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(BoroughBoundaries::parse("{ not json", DEFAULT_FEATURE_ID_KEY).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BoroughBoundaries::load(&dir.path().join("none.geojson"), DEFAULT_FEATURE_ID_KEY)
            .unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
