/// mfps_dashboard: Malaysia flood prediction dashboard core.
///
/// # Module structure
///
/// ```text
/// mfps_dashboard
/// ├── model       : shared data types (RainfallRecord, Month, RiskTier)
/// ├── config      : file locations and forecast defaults (mfps.toml)
/// ├── risk
/// │   └── thresholds : monthly / annual flood risk classification
/// ├── ingest
/// │   ├── records     : historical rainfall dataset (CSV)
/// │   ├── credentials : admin account table (CSV)
/// │   ├── boundaries  : district polygons (GeoJSON)
/// │   └── fixtures (test only) : small sample inputs
/// ├── analysis
/// │   ├── groupings    : filters, sums, means and flood counts per key
/// │   ├── rolling      : trailing moving average
/// │   ├── overview     : dataset / national / state headline numbers
/// │   ├── patterns     : rainfall pattern series for a year range
/// │   ├── district_map : per-district annual risk for the map
/// │   └── diagnostics  : admin dataset statistics
/// ├── forecast    : recursive multi-step rainfall forecaster
/// │   ├── artifact : serialized regression models
/// │   └── registry : (scope, input length) to artifact lookup
/// └── auth        : credential gate for the diagnostics view
/// ```

/// Public modules
pub mod analysis;
pub mod auth;
pub mod config;
pub mod forecast;
pub mod ingest;
pub mod model;
pub mod risk;
