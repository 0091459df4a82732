/// Serialized regression model artifacts.
///
/// Models are trained elsewhere and exported as JSON. Two shapes are
/// supported:
///
/// ```json
/// { "kind": "linear", "input_len": 6, "intercept": 12.5,
///   "coefficients": [0.1, 0.05, 0.1, 0.15, 0.2, 0.4] }
///
/// { "kind": "forest", "input_len": 6, "trees": [
///     { "nodes": [ { "feature": 5, "threshold": 250.0, "left": 1, "right": 2 },
///                  { "leaf": 180.0 }, { "leaf": 390.0 } ] } ] }
/// ```
///
/// Forest trees follow the scikit-learn convention: a sample goes to the
/// left child when `x[feature] <= threshold`. The forest predicts the mean
/// of its trees. Node 0 is the root, and every child index must be greater
/// than its parent's, which keeps evaluation loop-free.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::{ForecastError, Predictor};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Model artifact not found: {0}")]
    NotFound(String),
    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Malformed model artifact: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Artifact shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub input_len: usize,
    pub intercept: f64,
    /// One weight per input month, oldest first.
    pub coefficients: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub input_len: usize,
    pub trees: Vec<RegressionTree>,
}

/// A pre-trained predictor loaded from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelArtifact {
    Linear(LinearModel),
    Forest(ForestModel),
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl RegressionTree {
    fn validate(&self, tree_idx: usize, input_len: usize) -> Result<(), ArtifactError> {
        if self.nodes.is_empty() {
            return Err(ArtifactError::Invalid(format!("tree {} has no nodes", tree_idx)));
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split { feature, threshold, left, right } => {
                    if *feature >= input_len {
                        return Err(ArtifactError::Invalid(format!(
                            "tree {} node {} splits on feature {} but the model has {} inputs",
                            tree_idx, idx, feature, input_len
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ArtifactError::Invalid(format!(
                            "tree {} node {} has a non-finite threshold",
                            tree_idx, idx
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(ArtifactError::Invalid(format!(
                                "tree {} node {} has invalid child index {}",
                                tree_idx, idx, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(ArtifactError::Invalid(format!(
                            "tree {} node {} has a non-finite leaf value",
                            tree_idx, idx
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walks from the root to a leaf. Assumes `validate` passed.
    fn evaluate(&self, window: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { leaf } => return *leaf,
                TreeNode::Split { feature, threshold, left, right } => {
                    idx = if window[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

impl ModelArtifact {
    /// Short name of the model family ("linear" / "forest").
    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::Linear(_) => "linear",
            ModelArtifact::Forest(_) => "forest",
        }
    }

    /// Checks structural consistency. Called by `load_artifact` and
    /// `parse_artifact`, so a loaded artifact is always safe to evaluate.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            ModelArtifact::Linear(m) => {
                if m.coefficients.len() != m.input_len {
                    return Err(ArtifactError::Invalid(format!(
                        "linear model declares {} inputs but has {} coefficients",
                        m.input_len,
                        m.coefficients.len()
                    )));
                }
                if !m.intercept.is_finite() || m.coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(ArtifactError::Invalid(
                        "linear model has non-finite weights".to_string(),
                    ));
                }
            }
            ModelArtifact::Forest(m) => {
                if m.trees.is_empty() {
                    return Err(ArtifactError::Invalid("forest has no trees".to_string()));
                }
                for (i, tree) in m.trees.iter().enumerate() {
                    tree.validate(i, m.input_len)?;
                }
            }
        }
        Ok(())
    }
}

impl Predictor for ModelArtifact {
    fn input_len(&self) -> usize {
        match self {
            ModelArtifact::Linear(m) => m.input_len,
            ModelArtifact::Forest(m) => m.input_len,
        }
    }

    fn predict(&self, window: &[f64]) -> Result<f64, ForecastError> {
        if window.len() != self.input_len() {
            return Err(ForecastError::WindowMismatch {
                expected: self.input_len(),
                actual: window.len(),
            });
        }

        let value = match self {
            ModelArtifact::Linear(m) => {
                m.intercept
                    + m.coefficients
                        .iter()
                        .zip(window)
                        .map(|(c, x)| c * x)
                        .sum::<f64>()
            }
            ModelArtifact::Forest(m) => {
                let total: f64 = m.trees.iter().map(|t| t.evaluate(window)).sum();
                total / m.trees.len() as f64
            }
        };
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses and validates an artifact from JSON text.
pub fn parse_artifact(text: &str) -> Result<ModelArtifact, ArtifactError> {
    let artifact: ModelArtifact = serde_json::from_str(text)?;
    artifact.validate()?;
    Ok(artifact)
}

/// Loads and validates an artifact from disk.
pub fn load_artifact<P: AsRef<Path>>(path: P) -> Result<ModelArtifact, ArtifactError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    if !path.exists() {
        return Err(ArtifactError::NotFound(display));
    }

    let text = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: display.clone(),
        source,
    })?;

    let artifact = parse_artifact(&text)?;
    log::debug!("Parsed {} artifact from {}", artifact.kind(), display);
    Ok(artifact)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::{fixture_forest_artifact_json, fixture_linear_artifact_json};

    #[test]
    fn test_linear_fixture_predicts_latest_month() {
        let model = parse_artifact(fixture_linear_artifact_json()).expect("fixture should parse");
        assert_eq!(model.kind(), "linear");
        assert_eq!(model.input_len(), 6);
        let p = model
            .predict(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0])
            .expect("prediction");
        assert_eq!(p, 60.0);
    }

    #[test]
    fn test_forest_fixture_averages_trees() {
        let model = parse_artifact(fixture_forest_artifact_json()).expect("fixture should parse");
        assert_eq!(model.kind(), "forest");

        // Newest month <= 250 goes left in tree 1: (200 + 300) / 2
        let low = model.predict(&[0.0, 0.0, 0.0, 0.0, 0.0, 250.0]).expect("prediction");
        assert_eq!(low, 250.0);

        // Newest month > 250 goes right: (400 + 300) / 2
        let high = model.predict(&[0.0, 0.0, 0.0, 0.0, 0.0, 250.1]).expect("prediction");
        assert_eq!(high, 350.0);
    }

    #[test]
    fn test_wrong_window_length_is_rejected() {
        let model = parse_artifact(fixture_linear_artifact_json()).expect("fixture should parse");
        let err = model.predict(&[1.0; 7]).expect_err("7 inputs for a 6-input model");
        assert!(matches!(err, ForecastError::WindowMismatch { expected: 6, actual: 7 }));
    }

    #[test]
    fn test_coefficient_count_must_match_inputs() {
        let err = parse_artifact(
            r#"{"kind":"linear","input_len":7,"intercept":0.0,"coefficients":[1,1,1,1,1,1]}"#,
        )
        .expect_err("6 coefficients for 7 inputs");
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }

    #[test]
    fn test_empty_forest_is_rejected() {
        let err = parse_artifact(r#"{"kind":"forest","input_len":6,"trees":[]}"#)
            .expect_err("no trees");
        assert!(err.to_string().contains("no trees"));
    }

    #[test]
    fn test_backward_child_index_is_rejected() {
        let err = parse_artifact(
            r#"{"kind":"forest","input_len":6,"trees":[{"nodes":[
                {"feature":0,"threshold":1.0,"left":0,"right":1},
                {"leaf":1.0}
            ]}]}"#,
        )
        .expect_err("left child points at itself");
        assert!(err.to_string().contains("invalid child index 0"));
    }

    #[test]
    fn test_feature_out_of_range_is_rejected() {
        let err = parse_artifact(
            r#"{"kind":"forest","input_len":6,"trees":[{"nodes":[
                {"feature":6,"threshold":1.0,"left":1,"right":2},
                {"leaf":1.0},{"leaf":2.0}
            ]}]}"#,
        )
        .expect_err("feature 6 on a 6-input model");
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }

    #[test]
    fn test_unknown_kind_is_a_parse_error() {
        let err = parse_artifact(r#"{"kind":"svm","input_len":6}"#).expect_err("unknown kind");
        assert!(matches!(err, ArtifactError::Parse(_)));
    }

    #[test]
    fn test_missing_artifact_file() {
        let err = load_artifact("rf_models/does_not_exist.json").expect_err("missing file");
        assert!(matches!(err, ArtifactError::NotFound(_)));
    }
}
