//! The evaluator contract implemented by every pattern representation.
//!
//! An [`Evaluator`] owns the configured [`Objectives`] and knows how to inspect candidates of
//! one representation. The representation-specific part is small:
//!
//! - [`Evaluator::initialise`] binds the evaluator to a [`Problem`] once
//! - [`Evaluator::is_empty`] tells whether a candidate has no active condition
//! - [`Evaluator::participates`] tells whether a variable has an active condition
//!
//! Scoring is shared: [`Evaluator::calculate_measures`] turns a contingency table into a
//! validated list of measures using the objectives, whatever the representation.
//!
//! # Lifecycle
//!
//! ```text
//! Unconfigured --initialise--> Initialised --calculate_measures (repeated, parallel)--> ...
//! ```
//!
//! Scoring before `initialise` fails with [`EvaluationError::NotInitialised`]; a second
//! `initialise` fails with [`EvaluationError::AlreadyInitialised`].
//!
//! # Representations
//!
//! - [`RuleEvaluator`](crate::rule::RuleEvaluator): canonical rules, one label per variable
//! - [`FuzzyPatternEvaluator`](crate::fuzzy::FuzzyPatternEvaluator): DNF fuzzy patterns, one
//!   bit per linguistic label

use std::{fmt, sync::Arc};

use rulesift_measures::{BoxedQualityMeasure, ContingencyTable, MeasureError};

use crate::{EvaluationError, objectives::Objectives, problem::Problem};

/// Scores candidates of one pattern representation against the configured objectives.
///
/// Implementors provide the representation-specific inspection (`is_empty`,
/// `participates`) and the problem binding; scoring is shared through the default
/// [`Evaluator::calculate_measures`].
pub trait Evaluator: fmt::Debug + Send + Sync {
    /// Candidate encoding this evaluator understands.
    type Candidate: fmt::Debug + Send + Sync;

    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Objective templates, in configured order.
    fn objectives(&self) -> &Objectives;

    /// The bound problem, `None` until [`Evaluator::initialise`] succeeds.
    fn problem(&self) -> Option<&Arc<dyn Problem>>;

    /// Binds the evaluator to `problem`. Must be called exactly once.
    ///
    /// # Arguments
    ///
    /// * `problem` - Problem context shared read-only with every evaluation
    ///
    /// Fails with [`EvaluationError::AlreadyInitialised`] on a second call and with
    /// [`EvaluationError::EmptyProblem`] when the problem has no variables.
    fn initialise(&mut self, problem: Arc<dyn Problem>) -> Result<(), EvaluationError>;

    /// Returns `true` if the candidate has no active condition.
    ///
    /// # Panics
    ///
    /// Panics if called before [`Evaluator::initialise`] or if the candidate does not match
    /// the layout of the bound problem.
    fn is_empty(&self, candidate: &Self::Candidate) -> bool;

    /// Returns `true` if `variable` has an active condition in the candidate.
    ///
    /// Indices outside the problem's variables always yield `false`.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`Evaluator::is_empty`].
    fn participates(&self, candidate: &Self::Candidate, variable: usize) -> bool;

    /// Computes and validates a fresh copy of the objectives for `table`.
    ///
    /// The returned list has one measure per objective, in configured order. Neither the
    /// table nor the objective templates are modified, so concurrent calls are independent.
    ///
    /// The table must be non-empty and, when the problem knows its dataset size, sum to
    /// [`Problem::num_examples`]; otherwise [`EvaluationError::InvalidTable`] is returned.
    fn calculate_measures(
        &self,
        table: &ContingencyTable,
    ) -> Result<Vec<BoxedQualityMeasure>, EvaluationError> {
        let problem = self
            .problem()
            .ok_or_else(|| EvaluationError::NotInitialised {
                evaluator: self.name().to_owned(),
            })?;
        match problem.num_examples() {
            Some(expected) => table.check_total(expected)?,
            None => table.check()?,
        }
        self.objectives().evaluate(table).map_err(|source| {
            if let MeasureError::InvalidRange {
                measure_id, value, ..
            } = &source
            {
                tracing::error!(
                    measure = %measure_id,
                    value,
                    evaluator = self.name(),
                    problem = problem.name(),
                    "quality measure outside admissible range"
                );
            }
            EvaluationError::Measure {
                evaluator: self.name().to_owned(),
                problem: problem.name().to_owned(),
                source,
            }
        })
    }
}

/// Shared `initialise` bookkeeping for the built-in evaluators.
pub(crate) fn bind_problem(
    evaluator: &str,
    slot: &mut Option<Arc<dyn Problem>>,
    problem: Arc<dyn Problem>,
) -> Result<(), EvaluationError> {
    if slot.is_some() {
        return Err(EvaluationError::AlreadyInitialised {
            evaluator: evaluator.to_owned(),
        });
    }
    if problem.num_variables() == 0 {
        return Err(EvaluationError::EmptyProblem {
            problem: problem.name().to_owned(),
        });
    }
    tracing::debug!(
        evaluator,
        problem = problem.name(),
        variables = problem.num_variables(),
        "evaluator initialised"
    );
    *slot = Some(problem);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::thread;

    use rand::{Rng, SeedableRng as _};
    use rand_pcg::Pcg32;
    use rulesift_measures::{ContingencyTableError, MeasureKind, QualityMeasure, ValueRange};

    use super::*;
    use crate::{
        problem::{PatternProblem, Variable},
        rule::RuleEvaluator,
    };

    /// A confidence measure that forgets to divide.
    #[derive(Debug, Clone, Default)]
    struct BrokenConfidence {
        value: Option<f64>,
    }

    impl QualityMeasure for BrokenConfidence {
        fn id(&self) -> &str {
            "confidence"
        }

        fn name(&self) -> &str {
            "Confidence"
        }

        fn range(&self) -> ValueRange {
            ValueRange::UNIT
        }

        fn value(&self) -> Option<f64> {
            self.value
        }

        fn compute_value(&mut self, _table: &ContingencyTable) -> f64 {
            self.value = Some(1.2);
            1.2
        }

        fn reset(&mut self) {
            self.value = None;
        }

        fn clone_boxed(&self) -> BoxedQualityMeasure {
            Box::new(self.clone())
        }
    }

    fn problem() -> Arc<dyn Problem> {
        Arc::new(PatternProblem {
            name: "credit".to_owned(),
            variables: vec![
                Variable::new("income", ["low", "medium", "high"]),
                Variable::new("owner", ["yes", "no"]),
            ],
            class_labels: vec!["good".to_owned(), "bad".to_owned()],
            num_examples: None,
        })
    }

    fn initialised(objectives: Objectives) -> RuleEvaluator {
        let mut evaluator = RuleEvaluator::new(objectives);
        evaluator.initialise(problem()).unwrap();
        evaluator
    }

    fn values(measures: &[BoxedQualityMeasure]) -> Vec<f64> {
        measures.iter().map(|m| m.value().unwrap()).collect()
    }

    #[test]
    fn test_coverage_and_confidence() {
        let evaluator = initialised(Objectives::from_kinds(&[
            MeasureKind::Coverage,
            MeasureKind::Confidence,
        ]));
        let table = ContingencyTable::with_total(60, 20, 10, 10, 100).unwrap();
        let measures = evaluator.calculate_measures(&table).unwrap();
        assert_eq!(values(&measures), [0.8, 0.75]);
    }

    #[test]
    fn test_out_of_range_measure_is_rejected() {
        let objectives = Objectives::new(vec![
            MeasureKind::Coverage.build(),
            Box::new(BrokenConfidence::default()),
        ]);
        let evaluator = initialised(objectives);
        let err = evaluator
            .calculate_measures(&ContingencyTable::new(60, 20, 10, 10))
            .unwrap_err();
        assert!(err.is_invalid_range());
        assert_eq!(err.measure_id(), Some("confidence"));
        assert!(err.to_string().contains("credit"));
    }

    #[test]
    fn test_calculate_before_initialise() {
        let evaluator = RuleEvaluator::new(Objectives::from_kinds(&[MeasureKind::Support]));
        let err = evaluator
            .calculate_measures(&ContingencyTable::new(1, 0, 0, 0))
            .unwrap_err();
        assert_eq!(
            err,
            EvaluationError::NotInitialised {
                evaluator: RuleEvaluator::NAME.to_owned()
            }
        );
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let evaluator = initialised(Objectives::from_kinds(&[MeasureKind::Support]));
        let err = evaluator
            .calculate_measures(&ContingencyTable::default())
            .unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidTable { .. }));
    }

    #[test]
    fn test_table_must_match_dataset_size() {
        let problem = PatternProblem {
            name: "credit".to_owned(),
            variables: vec![Variable::new("owner", ["yes", "no"])],
            class_labels: vec![],
            num_examples: Some(100),
        };
        let mut evaluator = RuleEvaluator::new(Objectives::from_kinds(&[MeasureKind::Coverage]));
        evaluator.initialise(Arc::new(problem)).unwrap();

        assert!(evaluator.calculate_measures(&ContingencyTable::new(60, 20, 10, 10)).is_ok());
        let err = evaluator
            .calculate_measures(&ContingencyTable::new(60, 20, 10, 9))
            .unwrap_err();
        assert_eq!(
            err,
            EvaluationError::InvalidTable {
                source: ContingencyTableError::InconsistentTotal {
                    expected: 100,
                    actual: 99
                }
            }
        );
    }

    #[test]
    fn test_results_are_independent() {
        let evaluator = initialised(Objectives::from_kinds(&[MeasureKind::Coverage]));
        let mut first = evaluator
            .calculate_measures(&ContingencyTable::new(60, 20, 10, 10))
            .unwrap();
        let second = evaluator
            .calculate_measures(&ContingencyTable::new(10, 10, 40, 40))
            .unwrap();

        first[0].compute_value(&ContingencyTable::new(0, 0, 1, 0));
        assert_eq!(first[0].value(), Some(0.0));
        assert_eq!(second[0].value(), Some(0.2));
        assert!(evaluator.objectives().iter().all(|m| m.value().is_none()));
    }

    #[test]
    fn test_concurrent_calls_match_sequential() {
        let evaluator = initialised(Objectives::from_kinds(&MeasureKind::ALL));
        let mut rng = Pcg32::seed_from_u64(7);
        let tables = (0..256)
            .map(|_| {
                ContingencyTable::new(
                    rng.random_range(1..100),
                    rng.random_range(0..100),
                    rng.random_range(0..100),
                    rng.random_range(0..100),
                )
            })
            .collect::<Vec<_>>();
        let expected = tables
            .iter()
            .map(|t| values(&evaluator.calculate_measures(t).unwrap()))
            .collect::<Vec<_>>();

        let actual = thread::scope(|s| {
            let handles = tables
                .chunks(32)
                .map(|chunk| {
                    let evaluator = &evaluator;
                    s.spawn(move || {
                        chunk
                            .iter()
                            .map(|t| values(&evaluator.calculate_measures(t).unwrap()))
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect::<Vec<_>>()
        });
        assert_eq!(actual, expected);
    }
}
