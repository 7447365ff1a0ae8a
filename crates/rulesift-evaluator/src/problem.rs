//! Problem context: metadata about the dataset the search runs on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A descriptive variable of the dataset.
///
/// `labels` are the nominal values of a categorical variable, or the linguistic labels of
/// the fuzzy partition of a numeric one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub labels: Vec<String>,
}

impl Variable {
    #[must_use]
    pub fn new<S, L>(name: S, labels: L) -> Self
    where
        S: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }
}

/// Read-only metadata an evaluator binds to in [`Evaluator::initialise`].
///
/// [`Evaluator::initialise`]: crate::evaluator::Evaluator::initialise
pub trait Problem: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn variables(&self) -> &[Variable];

    fn class_labels(&self) -> &[String];

    /// Number of examples in the dataset, when known.
    ///
    /// Every contingency table scored against the problem must sum to this size.
    fn num_examples(&self) -> Option<u64> {
        None
    }

    fn num_variables(&self) -> usize {
        self.variables().len()
    }

    fn variable(&self, index: usize) -> Option<&Variable> {
        self.variables().get(index)
    }
}

/// A [`Problem`] described entirely by its configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternProblem {
    pub name: String,
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub class_labels: Vec<String>,
    #[serde(default)]
    pub num_examples: Option<u64>,
}

impl Problem for PatternProblem {
    fn name(&self) -> &str {
        &self.name
    }

    fn variables(&self) -> &[Variable] {
        &self.variables
    }

    fn class_labels(&self) -> &[String] {
        &self.class_labels
    }

    fn num_examples(&self) -> Option<u64> {
        self.num_examples
    }
}
