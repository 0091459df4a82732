/// District boundary loader.
///
/// The boundary file is a GeoJSON FeatureCollection whose features carry the
/// district name in `properties.NAME_2`. Geometry is kept as raw JSON; this
/// service never inspects it, it only filters and annotates features for
/// whatever renders the map.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Property holding the district name on each feature.
pub const DISTRICT_PROPERTY: &str = "NAME_2";

#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("GeoJSON file not found: {0}")]
    NotFound(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid GeoJSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Expected a FeatureCollection, got '{0}'")]
    NotAFeatureCollection(String),
}

/// A single district polygon feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryFeature {
    #[serde(rename = "type")]
    pub feature_type: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
    pub geometry: Value,
}

impl BoundaryFeature {
    /// District name of this feature, if present.
    pub fn district(&self) -> Option<&str> {
        self.properties.get(DISTRICT_PROPERTY).and_then(Value::as_str)
    }
}

/// The full boundary collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCollection {
    #[serde(rename = "type")]
    pub collection_type: String,
    pub features: Vec<BoundaryFeature>,
}

impl BoundaryCollection {
    /// Finds the feature for a district by exact name.
    pub fn find(&self, district: &str) -> Option<&BoundaryFeature> {
        self.features.iter().find(|f| f.district() == Some(district))
    }
}

/// Parses a boundary collection from a GeoJSON string.
pub fn parse_boundaries(text: &str) -> Result<BoundaryCollection, BoundaryError> {
    let collection: BoundaryCollection = serde_json::from_str(text)?;
    if collection.collection_type != "FeatureCollection" {
        return Err(BoundaryError::NotAFeatureCollection(collection.collection_type));
    }
    Ok(collection)
}

/// Loads the boundary file. A missing file is reported as `NotFound` so the
/// caller can abort the map view with a clear message.
pub fn load_boundaries<P: AsRef<Path>>(path: P) -> Result<BoundaryCollection, BoundaryError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    if !path.exists() {
        return Err(BoundaryError::NotFound(display));
    }

    let text = fs::read_to_string(path).map_err(|source| BoundaryError::Io {
        path: display,
        source,
    })?;
    parse_boundaries(&text)
}
