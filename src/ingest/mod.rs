/// Input loaders for the dashboard's external files.
///
/// Submodules:
/// - `records`    : historical rainfall/flood dataset (CSV)
/// - `credentials`: admin username/password table (CSV)
/// - `boundaries` : district polygons keyed by name (GeoJSON)
/// - `fixtures`   : test-only sample payloads

pub mod boundaries;
pub mod credentials;
pub mod records;

#[cfg(test)]
pub(crate) mod fixtures;
