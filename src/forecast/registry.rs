/// Model registry: which artifact serves which (scope, input length).
///
/// Nationwide models follow a filename convention inside the model
/// directory (`rf_overall_{n}m.json` by default). State models are listed in
/// a summary table:
///
/// ```text
/// State,Input_Months,Model_File
/// Kelantan,6,rf_Kelantan_6m.json
/// ```
///
/// The summary and the artifacts are read fresh on every lookup; nothing is
/// cached between requests.

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::artifact::{load_artifact, ModelArtifact};
use super::{ForecastError, ForecastScope, Predictor, WINDOW_RANGE};
use crate::config::Config;

/// One row of the state model summary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummaryEntry {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Input_Months")]
    pub input_months: usize,
    #[serde(rename = "Model_File")]
    pub model_file: String,
}

/// Parses a state model summary from any CSV source.
pub fn parse_summary<R: Read>(reader: R) -> Result<Vec<SummaryEntry>, ForecastError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut entries = Vec::new();
    for result in csv_reader.deserialize::<SummaryEntry>() {
        entries.push(result?);
    }
    Ok(entries)
}

/// Resolves artifact paths for forecast requests.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    dir: PathBuf,
    summary_path: PathBuf,
    overall_pattern: String,
}

impl ModelRegistry {
    pub fn new<P: AsRef<Path>>(dir: P, summary_file: &str, overall_pattern: &str) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            summary_path: dir.join(summary_file),
            dir,
            overall_pattern: overall_pattern.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            dir: config.models.dir.clone(),
            summary_path: config.state_summary_path(),
            overall_pattern: config.models.overall_pattern.clone(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the nationwide model for `input_len` months would live at.
    pub fn overall_path(&self, input_len: usize) -> PathBuf {
        self.dir
            .join(self.overall_pattern.replace("{n}", &input_len.to_string()))
    }

    /// Reads the state model summary.
    pub fn summary_entries(&self) -> Result<Vec<SummaryEntry>, ForecastError> {
        if !self.summary_path.exists() {
            return Err(ForecastError::SummaryMissing(
                self.summary_path.display().to_string(),
            ));
        }
        let file = File::open(&self.summary_path).map_err(|e| {
            ForecastError::Summary(csv::Error::from(e))
        })?;
        parse_summary(file)
    }

    /// States with at least one trained model, in summary order.
    pub fn states(&self) -> Result<Vec<String>, ForecastError> {
        let mut states: Vec<String> = Vec::new();
        for entry in self.summary_entries()? {
            if !states.contains(&entry.state) {
                states.push(entry.state);
            }
        }
        Ok(states)
    }

    /// Resolves the artifact file for a scope and input length.
    ///
    /// Returns `ModelUnavailable` when no model is registered or the
    /// registered file is absent.
    pub fn resolve(&self, scope: &ForecastScope, input_len: usize) -> Result<PathBuf, ForecastError> {
        let unavailable = || ForecastError::ModelUnavailable {
            scope: scope.to_string(),
            input_len,
        };

        let path = match scope {
            ForecastScope::Overall => self.overall_path(input_len),
            ForecastScope::State(name) => {
                let entries = self.summary_entries()?;
                let entry = entries
                    .iter()
                    .find(|e| &e.state == name && e.input_months == input_len)
                    .ok_or_else(unavailable)?;
                self.dir.join(&entry.model_file)
            }
        };

        if !path.exists() {
            log::warn!("Model file {} is missing", path.display());
            return Err(unavailable());
        }
        Ok(path)
    }

    /// Resolves and loads the artifact, checking it was trained for
    /// `input_len` months.
    pub fn load_predictor(
        &self,
        scope: &ForecastScope,
        input_len: usize,
    ) -> Result<ModelArtifact, ForecastError> {
        let path = self.resolve(scope, input_len)?;
        let artifact = load_artifact(&path)?;
        if artifact.input_len() != input_len {
            return Err(ForecastError::WindowMismatch {
                expected: artifact.input_len(),
                actual: input_len,
            });
        }
        Ok(artifact)
    }

    /// Attempts to load every model the registry knows about: each overall
    /// input length plus every summary row.
    pub fn check_all(&self) -> Vec<ModelCheck> {
        let mut checks: Vec<ModelCheck> = WINDOW_RANGE
            .map(|n| self.check(ForecastScope::Overall, n))
            .collect();

        match self.summary_entries() {
            Ok(entries) => {
                for entry in entries {
                    checks.push(self.check(ForecastScope::State(entry.state), entry.input_months));
                }
            }
            Err(e) => log::warn!("Skipping state models: {}", e),
        }
        checks
    }

    fn check(&self, scope: ForecastScope, input_len: usize) -> ModelCheck {
        let status = match self.load_predictor(&scope, input_len) {
            Ok(model) => CheckStatus::Loaded(model.kind()),
            Err(e) if e.is_unavailable() => CheckStatus::Missing,
            Err(e) => CheckStatus::Failed(e.to_string()),
        };
        ModelCheck { scope, input_len, status }
    }
}

// ---------------------------------------------------------------------------
// Registry checks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum CheckStatus {
    /// Artifact loaded; holds the model kind.
    Loaded(&'static str),
    Missing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelCheck {
    pub scope: ForecastScope,
    pub input_len: usize,
    pub status: CheckStatus,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
