/// Dashboard configuration loader - parses mfps.toml
///
/// Separates file locations and forecast defaults from code, making it easy
/// to point the tools at a different dataset or model directory without
/// recompiling. Every section has defaults matching the stock project layout,
/// so a partial (or absent) file still produces a usable configuration.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::forecast::{HORIZON_RANGE, WINDOW_RANGE};

/// Default configuration file name, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "mfps.toml";

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "MFPS_CONFIG";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// TOML structures
// ---------------------------------------------------------------------------

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub forecast: ForecastDefaults,
}

/// Input file locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Historical rainfall/flood records (CSV).
    pub records: PathBuf,
    /// Admin credential table (CSV: username,password).
    pub credentials: PathBuf,
    /// District boundary polygons (GeoJSON).
    pub boundaries: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            records: PathBuf::from("data/your_flood_data.csv"),
            credentials: PathBuf::from("data/admin_users.csv"),
            boundaries: PathBuf::from("data/malaysia_districts.geojson"),
        }
    }
}

/// Predictor artifact locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Directory holding every artifact and the state summary.
    pub dir: PathBuf,
    /// State model summary file name inside `dir`.
    pub state_summary: String,
    /// File name pattern for nationwide models; `{n}` is the input length.
    pub overall_pattern: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("rf_models"),
            state_summary: "state_model_summary.csv".to_string(),
            overall_pattern: "rf_overall_{n}m.json".to_string(),
        }
    }
}

/// Defaults for the forecast inputs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastDefaults {
    /// Number of past months fed to the predictor.
    pub input_months: usize,
    /// Number of future months to predict.
    pub horizon: usize,
    /// Value used for any input month the user leaves unspecified (mm).
    pub default_value_mm: f64,
}

impl Default for ForecastDefaults {
    fn default() -> Self {
        Self {
            input_months: 6,
            horizon: 6,
            default_value_mm: 200.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Loads configuration from a TOML file and validates it.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;

    let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })?;

    config.validate()?;
    Ok(config)
}

/// Loads configuration from `$MFPS_CONFIG` (after reading `.env`), falling
/// back to `mfps.toml` in the working directory. When neither file exists the
/// built-in defaults are used.
pub fn load_config_default() -> Result<Config, ConfigError> {
    dotenv::dotenv().ok();

    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return load_config(path);
    }

    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        load_config(DEFAULT_CONFIG_PATH)
    } else {
        log::debug!("{} not found, using built-in defaults", DEFAULT_CONFIG_PATH);
        Ok(Config::default())
    }
}

impl Config {
    /// Checks that the forecast defaults fall inside the allowed ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.forecast;
        if !WINDOW_RANGE.contains(&f.input_months) {
            return Err(ConfigError::Invalid(format!(
                "forecast.input_months must be between {} and {}, got {}",
                WINDOW_RANGE.start(),
                WINDOW_RANGE.end(),
                f.input_months
            )));
        }
        if !HORIZON_RANGE.contains(&f.horizon) {
            return Err(ConfigError::Invalid(format!(
                "forecast.horizon must be between {} and {}, got {}",
                HORIZON_RANGE.start(),
                HORIZON_RANGE.end(),
                f.horizon
            )));
        }
        if f.default_value_mm.is_nan() || f.default_value_mm < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "forecast.default_value_mm must be non-negative, got {}",
                f.default_value_mm
            )));
        }
        if !self.models.overall_pattern.contains("{n}") {
            return Err(ConfigError::Invalid(
                "models.overall_pattern must contain the {n} placeholder".to_string(),
            ));
        }
        Ok(())
    }

    /// Path of the state model summary table.
    pub fn state_summary_path(&self) -> PathBuf {
        self.models.dir.join(&self.models.state_summary)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
