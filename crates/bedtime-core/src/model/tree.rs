//! Regression tree ensembles.
//!
//! Trees are stored as flat node arrays with the root at index 0. A split
//! sends the input left when `value(feature) < threshold`. Children must sit
//! at a higher index than their parent, which keeps every walk finite.

use serde::{Deserialize, Serialize};

use super::{Feature, PredictionInput, SleepModel, SleepPrediction};
use crate::error::ModelError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: Feature,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn validate(&self, tree_index: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::InvalidArtifact(format!(
                "tree {tree_index} has no nodes"
            )));
        }
        let len = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if !threshold.is_finite() {
                        return Err(ModelError::InvalidArtifact(format!(
                            "tree {tree_index} node {i}: threshold is not finite"
                        )));
                    }
                    for child in [left, right] {
                        if child <= i || child >= len {
                            return Err(ModelError::InvalidArtifact(format!(
                                "tree {tree_index} node {i}: child {child} must be in {}..{len}",
                                i + 1
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(ModelError::InvalidArtifact(format!(
                            "tree {tree_index} node {i}: leaf value is not finite"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf.
    pub fn evaluate(&self, input: &PredictionInput) -> Result<f64, ModelError> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let next = if input.value(*feature) < *threshold {
                        *left
                    } else {
                        *right
                    };
                    if next <= index {
                        return Err(ModelError::InvalidArtifact(format!(
                            "node {index} points backwards to {next}"
                        )));
                    }
                    index = next;
                }
                None => {
                    return Err(ModelError::InvalidArtifact(format!(
                        "node {index} does not exist"
                    )))
                }
            }
        }
    }
}

/// `actual_sleep = base_score + Σ tree(input)`, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.base_score.is_finite() {
            return Err(ModelError::InvalidArtifact("base score is not finite".into()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::InvalidArtifact("ensemble has no trees".into()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i)?;
        }
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.trees.iter().map(|t| t.nodes.len()).sum()
    }
}

impl SleepModel for TreeEnsemble {
    fn predict(&self, input: &PredictionInput) -> Result<SleepPrediction, ModelError> {
        input.ensure_finite()?;
        let mut actual_sleep = self.base_score;
        for tree in &self.trees {
            actual_sleep += tree.evaluate(input)?;
        }
        SleepPrediction::checked(actual_sleep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: Feature, threshold: f64, low: f64, high: f64) -> RegressionTree {
        RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: low },
                TreeNode::Leaf { value: high },
            ],
        }
    }

    fn input(wake: f64, estimated_sleep: f64, coffee: f64) -> PredictionInput {
        PredictionInput {
            wake,
            estimated_sleep,
            coffee,
        }
    }

    #[test]
    fn sums_trees_on_top_of_base_score() {
        let ensemble = TreeEnsemble {
            base_score: 25_000.0,
            trees: vec![
                stump(Feature::EstimatedSleep, 7.0, 0.0, 3_600.0),
                stump(Feature::Coffee, 5.0, 0.0, 1_200.0),
            ],
        };
        ensemble.validate().unwrap();

        let rested = ensemble.predict(&input(25_200.0, 8.0, 1.0)).unwrap();
        assert_eq!(rested.actual_sleep, 28_600.0);

        let wired = ensemble.predict(&input(25_200.0, 6.0, 10.0)).unwrap();
        assert_eq!(wired.actual_sleep, 26_200.0);
    }

    #[test]
    fn threshold_equality_goes_right() {
        let tree = stump(Feature::Wake, 25_200.0, 1.0, 2.0);
        assert_eq!(tree.evaluate(&input(25_200.0, 8.0, 1.0)).unwrap(), 2.0);
        assert_eq!(tree.evaluate(&input(25_199.0, 8.0, 1.0)).unwrap(), 1.0);
    }

    #[test]
    fn validate_rejects_dangling_and_backward_children() {
        let dangling = TreeEnsemble {
            base_score: 0.0,
            trees: vec![RegressionTree {
                nodes: vec![
                    TreeNode::Split {
                        feature: Feature::Coffee,
                        threshold: 2.0,
                        left: 1,
                        right: 5,
                    },
                    TreeNode::Leaf { value: 1.0 },
                ],
            }],
        };
        assert!(matches!(
            dangling.validate(),
            Err(ModelError::InvalidArtifact(_))
        ));

        let cyclic = TreeEnsemble {
            base_score: 0.0,
            trees: vec![RegressionTree {
                nodes: vec![TreeNode::Split {
                    feature: Feature::Coffee,
                    threshold: 2.0,
                    left: 0,
                    right: 0,
                }],
            }],
        };
        assert!(matches!(
            cyclic.validate(),
            Err(ModelError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn validate_rejects_empty_ensemble_and_empty_tree() {
        let empty = TreeEnsemble {
            base_score: 0.0,
            trees: vec![],
        };
        assert!(empty.validate().is_err());

        let hollow = TreeEnsemble {
            base_score: 0.0,
            trees: vec![RegressionTree { nodes: vec![] }],
        };
        assert!(hollow.validate().is_err());
    }

    #[test]
    fn evaluate_guards_unvalidated_cycles() {
        let tree = RegressionTree {
            nodes: vec![TreeNode::Split {
                feature: Feature::Wake,
                threshold: 0.0,
                left: 0,
                right: 0,
            }],
        };
        assert!(tree.evaluate(&input(1.0, 8.0, 1.0)).is_err());
    }
}
