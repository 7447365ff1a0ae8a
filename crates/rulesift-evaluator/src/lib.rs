//! Evaluation engine turning contingency tables into validated objective values.
//!
//! The engine sits between user-configured quality measures and the optimizer of an
//! evolutionary pattern search. For every candidate it produces a fresh list of computed
//! measures and guarantees each value lies inside the range its measure declares.
//!
//! # Architecture
//!
//! ```text
//! ListEvaluator (batch of candidates, bounded-depth tree reduction)
//!     ↓ uses
//! Evaluator (representation contract + calculate_measures)
//!     ↓ uses
//! Objectives (measure templates → validated working copies)
//!     ↓ uses
//! QualityMeasure (rulesift-measures)
//! ```
//!
//! # Modules
//!
//! - [`problem`] - problem context the evaluators bind to
//! - [`objectives`] - configured measure templates and working copies
//! - [`evaluator`] - the [`Evaluator`](evaluator::Evaluator) trait
//! - [`rule`] and [`fuzzy`] - the built-in pattern representations
//! - [`tree_reduce`] - bounded-depth parallel reduction
//! - [`list_evaluator`] - sequential and parallel batch evaluation
//! - [`summary`] - mergeable per-objective statistics
//! - [`config`] - JSON configuration surface
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use rulesift_evaluator::{
//!     evaluator::Evaluator,
//!     objectives::Objectives,
//!     problem::{PatternProblem, Variable},
//!     rule::{RuleEvaluator, RuleGenome},
//! };
//! use rulesift_measures::{ContingencyTable, MeasureKind, QualityMeasure};
//!
//! let problem = PatternProblem {
//!     name: "weather".to_owned(),
//!     variables: vec![
//!         Variable::new("outlook", ["sunny", "overcast", "rainy"]),
//!         Variable::new("windy", ["yes", "no"]),
//!     ],
//!     class_labels: vec!["play".to_owned(), "stay".to_owned()],
//!     num_examples: Some(100),
//! };
//! let objectives = Objectives::from_kinds(&[MeasureKind::Coverage, MeasureKind::Confidence]);
//! let mut evaluator = RuleEvaluator::new(objectives);
//! evaluator.initialise(Arc::new(problem)).unwrap();
//!
//! // outlook = overcast, windy not used
//! let rule = RuleGenome::new(vec![1, 2]);
//! assert!(!evaluator.is_empty(&rule));
//! assert!(evaluator.participates(&rule, 0));
//! assert!(!evaluator.participates(&rule, 1));
//!
//! let table = ContingencyTable::with_total(60, 20, 10, 10, 100).unwrap();
//! let measures = evaluator.calculate_measures(&table).unwrap();
//! let values = measures.iter().map(|m| m.value().unwrap()).collect::<Vec<_>>();
//! assert_eq!(values, [0.8, 0.75]);
//! ```

use rulesift_measures::{ContingencyTableError, MeasureError};

pub mod config;
pub mod evaluator;
pub mod fuzzy;
pub mod list_evaluator;
pub mod objectives;
pub mod problem;
pub mod rule;
pub mod summary;
pub mod tree_reduce;

/// Error returned by evaluators and list evaluators.
///
/// Range violations are reported as [`EvaluationError::Measure`] and never clamped; the
/// other variants are broken preconditions of the caller.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EvaluationError {
    /// Scoring was requested before [`Evaluator::initialise`](evaluator::Evaluator::initialise).
    #[display("evaluator '{evaluator}' used before initialise")]
    NotInitialised { evaluator: String },
    #[display("evaluator '{evaluator}' is already initialised")]
    AlreadyInitialised { evaluator: String },
    #[display("problem '{problem}' has no variables")]
    EmptyProblem { problem: String },
    /// The table cannot be scored or does not match the problem's dataset size.
    #[from]
    #[display("invalid contingency table: {source}")]
    InvalidTable { source: ContingencyTableError },
    /// A measure failed validation, typically by leaving its declared range.
    #[display("evaluator '{evaluator}' on problem '{problem}': {source}")]
    Measure {
        evaluator: String,
        problem: String,
        source: MeasureError,
    },
}

impl EvaluationError {
    /// Identifier of the measure that failed validation, if this is a measure error.
    #[must_use]
    pub fn measure_id(&self) -> Option<&str> {
        match self {
            Self::Measure {
                source:
                    MeasureError::InvalidRange { measure_id, .. }
                    | MeasureError::NotComputed { measure_id },
                ..
            } => Some(measure_id),
            _ => None,
        }
    }

    /// Returns `true` if a measure value fell outside its declared range.
    #[must_use]
    pub fn is_invalid_range(&self) -> bool {
        matches!(
            self,
            Self::Measure {
                source: MeasureError::InvalidRange { .. },
                ..
            }
        )
    }
}
