/// Recursive multi-step rainfall forecasting.
///
/// A predictor maps the last N monthly rainfall values to the next month's
/// value. To look M months ahead, the forecaster seeds a sequence with the N
/// observed values, asks the predictor for one step, appends the prediction,
/// and repeats on the newest N entries until M values have been produced.
/// Later steps therefore consume earlier predictions as inputs.
///
/// Submodules:
/// - `artifact`: serialized regression models and their evaluation
/// - `registry`: maps (scope, input length) to an artifact file

pub mod artifact;
pub mod registry;

use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

use crate::model::RiskTier;
use crate::risk::thresholds::classify_monthly;

use self::artifact::ArtifactError;
use self::registry::ModelRegistry;

/// Allowed number of past months fed to a predictor.
pub const WINDOW_RANGE: RangeInclusive<usize> = 6..=11;

/// Allowed number of months to predict.
pub const HORIZON_RANGE: RangeInclusive<usize> = 1..=12;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Input window must hold between 6 and 11 months, got {len}")]
    InvalidWindow { len: usize },
    #[error("Horizon must be between 1 and 12 months, got {horizon}")]
    InvalidHorizon { horizon: usize },
    #[error("Input month {index} has invalid rainfall {value}")]
    InvalidInput { index: usize, value: f64 },
    #[error("Predictor expects {expected} input months, got {actual}")]
    WindowMismatch { expected: usize, actual: usize },
    #[error("Model not available for {scope} with {input_len} input months")]
    ModelUnavailable { scope: String, input_len: usize },
    #[error("State model summary not found: {0}")]
    SummaryMissing(String),
    #[error("Failed to read state model summary: {0}")]
    Summary(#[from] csv::Error),
    #[error("Predictor returned a non-finite value at step {step}")]
    NonFinite { step: usize },
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

impl ForecastError {
    /// True when the failure means "no model for this request" rather than a
    /// fault. Callers report these as warnings and skip the forecast.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ForecastError::ModelUnavailable { .. }
                | ForecastError::SummaryMissing(_)
                | ForecastError::Artifact(ArtifactError::NotFound(_))
        )
    }
}

// ---------------------------------------------------------------------------
// Predictor seam
// ---------------------------------------------------------------------------

/// Anything that can turn a window of past monthly rainfall into the next
/// month's rainfall.
pub trait Predictor {
    /// Number of months the predictor consumes per call.
    fn input_len(&self) -> usize;

    /// Predicts the month following `window`. `window.len()` always equals
    /// `input_len()` when called from `forecast_recursive`.
    fn predict(&self, window: &[f64]) -> Result<f64, ForecastError>;
}

/// Adapts a closure into a `Predictor`.
pub struct FnPredictor<F> {
    input_len: usize,
    f: F,
}

impl<F> FnPredictor<F>
where
    F: Fn(&[f64]) -> f64,
{
    pub fn new(input_len: usize, f: F) -> Self {
        Self { input_len, f }
    }
}

impl<F> Predictor for FnPredictor<F>
where
    F: Fn(&[f64]) -> f64,
{
    fn input_len(&self) -> usize {
        self.input_len
    }

    fn predict(&self, window: &[f64]) -> Result<f64, ForecastError> {
        Ok((self.f)(window))
    }
}

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

/// Geographic scope a model was trained for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ForecastScope {
    Overall,
    State(String),
}

impl fmt::Display for ForecastScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastScope::Overall => write!(f, "Malaysia"),
            ForecastScope::State(name) => write!(f, "{}", name),
        }
    }
}

/// A validated forecast request: N observed months and a horizon M.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRequest {
    window: Vec<f64>,
    horizon: usize,
}

impl ForecastRequest {
    pub fn new(window: Vec<f64>, horizon: usize) -> Result<Self, ForecastError> {
        if !WINDOW_RANGE.contains(&window.len()) {
            return Err(ForecastError::InvalidWindow { len: window.len() });
        }
        if !HORIZON_RANGE.contains(&horizon) {
            return Err(ForecastError::InvalidHorizon { horizon });
        }
        if let Some((i, v)) = window
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(ForecastError::InvalidInput { index: i + 1, value: *v });
        }
        Ok(Self { window, horizon })
    }

    pub fn window(&self) -> &[f64] {
        &self.window
    }

    pub fn input_len(&self) -> usize {
        self.window.len()
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }
}

/// One predicted month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastStep {
    /// Position in the combined input+prediction sequence, 1-based.
    pub month: usize,
    /// Display label, e.g. "Month 7".
    pub label: String,
    /// Predicted rainfall (mm), unrounded.
    pub value_mm: f64,
    pub risk: RiskTier,
}

impl ForecastStep {
    /// Prediction rounded to two decimals for display.
    pub fn rounded(&self) -> f64 {
        (self.value_mm * 100.0).round() / 100.0
    }
}

/// Result of a recursive forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub inputs: Vec<f64>,
    pub steps: Vec<ForecastStep>,
}

impl Forecast {
    /// Month number of the first prediction (N + 1).
    pub fn start_month(&self) -> usize {
        self.inputs.len() + 1
    }

    /// Predicted values in order.
    pub fn values(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.value_mm).collect()
    }

    /// Highest risk tier reached over the horizon.
    pub fn peak_risk(&self) -> Option<RiskTier> {
        self.steps.iter().map(|s| s.risk).max()
    }
}

// ---------------------------------------------------------------------------
// Forecasting
// ---------------------------------------------------------------------------

/// Runs the recursive one-step-ahead forecast.
///
/// Each step passes exactly the newest N values of the growing sequence to
/// the predictor. No correction is applied between steps, so any error in an
/// early prediction carries into every later one.
pub fn forecast_recursive(
    predictor: &dyn Predictor,
    request: &ForecastRequest,
) -> Result<Forecast, ForecastError> {
    let n = request.input_len();
    if predictor.input_len() != n {
        return Err(ForecastError::WindowMismatch {
            expected: predictor.input_len(),
            actual: n,
        });
    }

    let mut sequence = request.window().to_vec();
    sequence.reserve(request.horizon());
    let mut steps = Vec::with_capacity(request.horizon());

    for step in 0..request.horizon() {
        let window = &sequence[sequence.len() - n..];
        let value = predictor.predict(window)?;
        if !value.is_finite() {
            return Err(ForecastError::NonFinite { step: step + 1 });
        }

        let month = n + 1 + step;
        steps.push(ForecastStep {
            month,
            label: format!("Month {}", month),
            value_mm: value,
            risk: classify_monthly(value),
        });
        sequence.push(value);
    }

    Ok(Forecast {
        inputs: request.window().to_vec(),
        steps,
    })
}

/// Resolves and loads the artifact for `scope`, then forecasts.
///
/// The artifact is loaded fresh on every call.
pub fn run_forecast(
    registry: &ModelRegistry,
    scope: &ForecastScope,
    request: &ForecastRequest,
) -> Result<Forecast, ForecastError> {
    let model = registry.load_predictor(scope, request.input_len())?;
    log::info!(
        "Loaded {} model for {} ({} input months)",
        model.kind(),
        scope,
        request.input_len()
    );

    let forecast = forecast_recursive(&model, request)?;
    log::debug!(
        "Forecast for {}: {} steps, peak risk {:?}",
        scope,
        forecast.steps.len(),
        forecast.peak_risk()
    );
    Ok(forecast)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
