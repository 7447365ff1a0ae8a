//! Batch evaluation of candidate lists.
//!
//! A search evaluates a whole generation at once. A [`ListEvaluator`] takes the candidates
//! paired with their contingency tables and returns one outcome per candidate, in input
//! order, plus a [`BatchSummary`].
//!
//! Failures are per candidate: a measure out of range fails that candidate only, and the
//! caller decides whether to drop it ([`BatchEvaluation::outcomes`]) or abort the run
//! ([`BatchEvaluation::into_evaluations`], which yields the first failure in input order).
//! Only an evaluator that has not been initialised fails the whole batch.
//!
//! Two implementations are provided:
//!
//! - [`SequentialListEvaluator`] evaluates on the calling thread
//! - [`TreeReduceListEvaluator`] splits the batch with [`tree_reduce`] and merges the
//!   per-candidate results pairwise
//!
//! Both return identical outcomes for the same input, since every candidate is scored on its
//! own working copy of the objectives.

use std::fmt;

use rulesift_measures::{BoxedQualityMeasure, ContingencyTable, QualityMeasure};

use crate::{
    EvaluationError,
    evaluator::Evaluator,
    summary::{BatchSummary, ObjectiveSummary},
    tree_reduce::{TreeReduceConfig, tree_reduce},
};

/// Validated measures of one candidate.
#[derive(Debug, Clone)]
pub struct CandidateEvaluation {
    measures: Vec<BoxedQualityMeasure>,
    empty: bool,
}

impl CandidateEvaluation {
    #[must_use]
    pub fn measures(&self) -> &[BoxedQualityMeasure] {
        &self.measures
    }

    /// Whether the candidate encodes the empty pattern.
    #[must_use]
    pub fn is_empty_pattern(&self) -> bool {
        self.empty
    }

    /// Computed values in objective order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.measures
            .iter()
            .map(|m| m.value().unwrap_or(f64::NAN))
    }

    /// Values signed for a minimising optimizer, in objective order.
    pub fn objective_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.measures
            .iter()
            .map(|m| m.objective_value().unwrap_or(f64::NAN))
    }

    fn summary(&self) -> BatchSummary {
        BatchSummary {
            evaluated: 1,
            failed: 0,
            empty_patterns: usize::from(self.empty),
            objectives: self.values().map(ObjectiveSummary::from_value).collect(),
        }
    }
}

impl PartialEq for CandidateEvaluation {
    fn eq(&self, other: &Self) -> bool {
        self.empty == other.empty
            && self.measures.len() == other.measures.len()
            && self.measures.iter().zip(&other.measures).all(|(a, b)| {
                a.id() == b.id() && a.value().map(f64::to_bits) == b.value().map(f64::to_bits)
            })
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchEvaluation {
    outcomes: Vec<Result<CandidateEvaluation, EvaluationError>>,
    summary: BatchSummary,
}

impl BatchEvaluation {
    fn single(outcome: Result<CandidateEvaluation, EvaluationError>) -> Self {
        let summary = match &outcome {
            Ok(evaluation) => evaluation.summary(),
            Err(_) => BatchSummary {
                evaluated: 1,
                failed: 1,
                ..BatchSummary::default()
            },
        };
        Self {
            outcomes: vec![outcome],
            summary,
        }
    }

    fn merge(mut self, other: Self) -> Self {
        self.outcomes.extend(other.outcomes);
        self.summary = self.summary.merge(other.summary);
        self
    }

    #[must_use]
    pub fn outcomes(&self) -> &[Result<CandidateEvaluation, EvaluationError>] {
        &self.outcomes
    }

    #[must_use]
    pub fn summary(&self) -> &BatchSummary {
        &self.summary
    }

    /// First failure in input order.
    #[must_use]
    pub fn first_error(&self) -> Option<&EvaluationError> {
        self.outcomes.iter().find_map(|o| o.as_ref().err())
    }

    /// Returns every evaluation, or the first failure in input order.
    pub fn into_evaluations(self) -> Result<Vec<CandidateEvaluation>, EvaluationError> {
        self.outcomes.into_iter().collect()
    }
}

/// Evaluates lists of candidates with an [`Evaluator`].
pub trait ListEvaluator<E>: fmt::Debug + Send + Sync
where
    E: Evaluator,
{
    fn evaluate(
        &self,
        evaluator: &E,
        batch: &[(E::Candidate, ContingencyTable)],
    ) -> Result<BatchEvaluation, EvaluationError>;
}

/// Scores one candidate: its measures and whether it is the empty pattern.
pub fn evaluate_candidate<E>(
    evaluator: &E,
    candidate: &E::Candidate,
    table: &ContingencyTable,
) -> Result<CandidateEvaluation, EvaluationError>
where
    E: Evaluator + ?Sized,
{
    let measures = evaluator.calculate_measures(table)?;
    let empty = evaluator.is_empty(candidate);
    Ok(CandidateEvaluation { measures, empty })
}

fn evaluate_batch<E>(
    evaluator: &E,
    batch: &[(E::Candidate, ContingencyTable)],
    config: TreeReduceConfig,
) -> Result<BatchEvaluation, EvaluationError>
where
    E: Evaluator,
{
    if evaluator.problem().is_none() {
        return Err(EvaluationError::NotInitialised {
            evaluator: evaluator.name().to_owned(),
        });
    }
    let evaluation = tree_reduce(
        batch,
        config,
        |(candidate, table)| BatchEvaluation::single(evaluate_candidate(evaluator, candidate, table)),
        BatchEvaluation::merge,
    )
    .unwrap_or_default();
    tracing::debug!(
        evaluator = evaluator.name(),
        candidates = batch.len(),
        failed = evaluation.summary.failed,
        "batch evaluated"
    );
    Ok(evaluation)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialListEvaluator;

impl<E> ListEvaluator<E> for SequentialListEvaluator
where
    E: Evaluator,
{
    fn evaluate(
        &self,
        evaluator: &E,
        batch: &[(E::Candidate, ContingencyTable)],
    ) -> Result<BatchEvaluation, EvaluationError> {
        evaluate_batch(evaluator, batch, TreeReduceConfig::sequential())
    }
}

/// Parallel list evaluator using a bounded-depth pairwise reduction.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeReduceListEvaluator {
    config: TreeReduceConfig,
}

impl TreeReduceListEvaluator {
    #[must_use]
    pub const fn new(config: TreeReduceConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> TreeReduceConfig {
        self.config
    }
}

impl<E> ListEvaluator<E> for TreeReduceListEvaluator
where
    E: Evaluator,
{
    fn evaluate(
        &self,
        evaluator: &E,
        batch: &[(E::Candidate, ContingencyTable)],
    ) -> Result<BatchEvaluation, EvaluationError> {
        evaluate_batch(evaluator, batch, self.config)
    }
}
