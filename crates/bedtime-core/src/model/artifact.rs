//! Model artifact loading.
//!
//! Artifacts are TOML or JSON documents tagged by `kind`. The format is
//! chosen from the file extension. A linear artifact is compiled into the
//! library and used when no path is configured.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Feature, LinearModel, PredictionInput, SleepModel, SleepPrediction, TreeEnsemble};
use crate::error::ModelError;

/// Artifact compiled into the library.
pub const BUNDLED_ARTIFACT: &str = include_str!("../../models/sleep_calculator.toml");

/// A deserialized, validated model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    pub fn from_toml_str(content: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = toml::from_str(content)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(content)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Read an artifact from disk. `.toml` and `.json` are supported.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let parse: fn(&str) -> Result<Self, ModelError> = match ext.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(ModelError::UnsupportedFormat(path.to_path_buf())),
        };

        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact = parse(&content)?;
        tracing::debug!(
            path = %path.display(),
            kind = artifact.kind(),
            "loaded sleep model artifact"
        );
        Ok(artifact)
    }

    pub fn bundled() -> Result<Self, ModelError> {
        Self::from_toml_str(BUNDLED_ARTIFACT)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            ModelArtifact::Linear(m) => m.validate(),
            ModelArtifact::TreeEnsemble(m) => m.validate(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::Linear(_) => "linear",
            ModelArtifact::TreeEnsemble(_) => "tree_ensemble",
        }
    }

    /// Features the artifact actually consults.
    pub fn features(&self) -> Vec<Feature> {
        match self {
            ModelArtifact::Linear(_) => Feature::ALL.to_vec(),
            ModelArtifact::TreeEnsemble(m) => Feature::ALL
                .into_iter()
                .filter(|f| {
                    m.trees.iter().flat_map(|t| &t.nodes).any(|n| {
                        matches!(n, super::TreeNode::Split { feature, .. } if feature == f)
                    })
                })
                .collect(),
        }
    }

    pub fn summary(&self, source: &ModelSource) -> ModelSummary {
        let (trees, nodes) = match self {
            ModelArtifact::Linear(_) => (0, 0),
            ModelArtifact::TreeEnsemble(m) => (m.trees.len(), m.node_count()),
        };
        ModelSummary {
            source: source.to_string(),
            kind: self.kind(),
            features: self.features().iter().map(Feature::name).collect(),
            trees,
            nodes,
        }
    }
}

impl SleepModel for ModelArtifact {
    fn predict(&self, input: &PredictionInput) -> Result<SleepPrediction, ModelError> {
        match self {
            ModelArtifact::Linear(m) => m.predict(input),
            ModelArtifact::TreeEnsemble(m) => m.predict(input),
        }
    }
}

/// Where a model artifact comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelSource {
    #[default]
    Bundled,
    File(PathBuf),
}

impl ModelSource {
    /// An empty path selects the bundled artifact.
    pub fn from_path_setting(path: &str) -> Self {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            ModelSource::Bundled
        } else {
            ModelSource::File(PathBuf::from(trimmed))
        }
    }

    pub fn load(&self) -> Result<ModelArtifact, ModelError> {
        match self {
            ModelSource::Bundled => ModelArtifact::bundled(),
            ModelSource::File(path) => ModelArtifact::load(path),
        }
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::Bundled => write!(f, "bundled"),
            ModelSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Description of a loaded artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub source: String,
    pub kind: &'static str,
    pub features: Vec<&'static str>,
    pub trees: usize,
    pub nodes: usize,
}
