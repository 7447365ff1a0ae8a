//! Canonical rule representation.
//!
//! A canonical rule holds one gene per variable. A gene below the variable's label count
//! selects that label as the condition `variable = label`; any larger gene means the
//! variable does not take part in the rule.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    EvaluationError,
    evaluator::{self, Evaluator},
    objectives::Objectives,
    problem::Problem,
};

/// A canonical rule: one label index per variable, serialized as a plain array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleGenome {
    genes: Vec<u32>,
}

impl RuleGenome {
    #[must_use]
    pub fn new(genes: Vec<u32>) -> Self {
        Self { genes }
    }

    #[must_use]
    pub fn genes(&self) -> &[u32] {
        &self.genes
    }
}

/// [`Evaluator`] for [`RuleGenome`] candidates.
///
/// After [`Evaluator::initialise`] it caches the label count of every variable, which is
/// all the layout information a canonical rule needs.
#[derive(Debug, Clone)]
pub struct RuleEvaluator {
    objectives: Objectives,
    problem: Option<Arc<dyn Problem>>,
    label_counts: Vec<u32>,
}

impl RuleEvaluator {
    pub const NAME: &'static str = "canonical_rule";

    /// Creates an unbound evaluator scoring with `objectives`.
    #[must_use]
    pub fn new(objectives: Objectives) -> Self {
        Self {
            objectives,
            problem: None,
            label_counts: vec![],
        }
    }

    /// Indices of the variables with an active condition, in ascending order.
    pub fn active_variables<'a>(
        &'a self,
        candidate: &'a RuleGenome,
    ) -> impl Iterator<Item = usize> + 'a {
        let label_counts = self.layout(candidate);
        candidate
            .genes
            .iter()
            .zip(label_counts)
            .enumerate()
            .filter(|(_, (gene, count))| gene < count)
            .map(|(i, _)| i)
    }

    fn layout(&self, candidate: &RuleGenome) -> &[u32] {
        assert!(
            self.problem.is_some(),
            "{} evaluator used before initialise",
            Self::NAME
        );
        assert_eq!(
            candidate.genes.len(),
            self.label_counts.len(),
            "rule genome length does not match the number of variables"
        );
        &self.label_counts
    }
}

impl Evaluator for RuleEvaluator {
    type Candidate = RuleGenome;

    fn name(&self) -> &str {
        Self::NAME
    }

    fn objectives(&self) -> &Objectives {
        &self.objectives
    }

    fn problem(&self) -> Option<&Arc<dyn Problem>> {
        self.problem.as_ref()
    }

    fn initialise(&mut self, problem: Arc<dyn Problem>) -> Result<(), EvaluationError> {
        let label_counts = problem
            .variables()
            .iter()
            .map(|v| u32::try_from(v.num_labels()).unwrap_or(u32::MAX))
            .collect();
        evaluator::bind_problem(Self::NAME, &mut self.problem, problem)?;
        self.label_counts = label_counts;
        Ok(())
    }

    fn is_empty(&self, candidate: &RuleGenome) -> bool {
        self.active_variables(candidate).next().is_none()
    }

    fn participates(&self, candidate: &RuleGenome, variable: usize) -> bool {
        let label_counts = self.layout(candidate);
        label_counts
            .get(variable)
            .is_some_and(|count| candidate.genes[variable] < *count)
    }
}

#[cfg(test)]
mod tests {
    use rulesift_measures::MeasureKind;

    use super::*;
    use crate::problem::{PatternProblem, Variable};

    fn problem() -> Arc<dyn Problem> {
        Arc::new(PatternProblem {
            name: "weather".to_owned(),
            variables: vec![
                Variable::new("outlook", ["sunny", "overcast", "rainy"]),
                Variable::new("humidity", ["high", "normal"]),
                Variable::new("windy", ["yes", "no"]),
            ],
            class_labels: vec![],
            num_examples: None,
        })
    }

    fn evaluator() -> RuleEvaluator {
        let mut evaluator = RuleEvaluator::new(Objectives::from_kinds(&[MeasureKind::Coverage]));
        evaluator.initialise(problem()).unwrap();
        evaluator
    }

    #[test]
    fn test_empty_rule() {
        let evaluator = evaluator();
        assert!(evaluator.is_empty(&RuleGenome::new(vec![3, 2, 2])));
        assert!(evaluator.is_empty(&RuleGenome::new(vec![7, 9, u32::MAX])));
        assert!(!evaluator.is_empty(&RuleGenome::new(vec![3, 1, 2])));
    }

    #[test]
    fn test_participates_matches_active_variables() {
        let evaluator = evaluator();
        let rule = RuleGenome::new(vec![0, 2, 1]);
        assert_eq!(evaluator.active_variables(&rule).collect::<Vec<_>>(), [0, 2]);
        for v in 0..3 {
            assert_eq!(
                evaluator.participates(&rule, v),
                evaluator.active_variables(&rule).any(|a| a == v)
            );
        }
    }

    #[test]
    fn test_participates_out_of_range_is_false() {
        let evaluator = evaluator();
        let rule = RuleGenome::new(vec![0, 0, 0]);
        assert!(!evaluator.participates(&rule, 3));
        assert!(!evaluator.participates(&rule, usize::MAX));
    }

    #[test]
    fn test_initialise_twice_fails() {
        let mut evaluator = evaluator();
        assert_eq!(
            evaluator.initialise(problem()),
            Err(EvaluationError::AlreadyInitialised {
                evaluator: RuleEvaluator::NAME.to_owned()
            })
        );
    }

    #[test]
    fn test_initialise_rejects_problem_without_variables() {
        let mut evaluator = RuleEvaluator::new(Objectives::default());
        let problem = Arc::new(PatternProblem {
            name: "empty".to_owned(),
            variables: vec![],
            class_labels: vec![],
            num_examples: None,
        });
        assert_eq!(
            evaluator.initialise(problem),
            Err(EvaluationError::EmptyProblem {
                problem: "empty".to_owned()
            })
        );
        assert!(evaluator.problem().is_none());
    }

    #[test]
    #[should_panic(expected = "used before initialise")]
    fn test_is_empty_before_initialise_panics() {
        let evaluator = RuleEvaluator::new(Objectives::default());
        let _ = evaluator.is_empty(&RuleGenome::new(vec![0]));
    }

    #[test]
    #[should_panic(expected = "rule genome length")]
    fn test_mismatched_genome_panics() {
        let _ = evaluator().participates(&RuleGenome::new(vec![0, 0]), 0);
    }

    #[test]
    fn test_genome_serializes_as_plain_array() {
        let rule: RuleGenome = serde_json::from_str("[0, 2, 1]").unwrap();
        assert_eq!(rule.genes(), [0, 2, 1]);
    }
}
