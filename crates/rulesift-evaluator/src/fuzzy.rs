//! DNF fuzzy pattern representation.
//!
//! A DNF genome holds one bit per linguistic label of every variable, laid out variable after
//! variable. The labels set for a variable form the disjunction `variable IS l1 OR l2 ...`.
//! A variable takes part in the pattern only when its bits are mixed: with no label set
//! there is nothing to match, and with every label set the condition accepts any value.

use std::{ops::Range, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    EvaluationError,
    evaluator::{self, Evaluator},
    objectives::Objectives,
    problem::Problem,
};

/// A DNF fuzzy pattern: one bit per (variable, label), serialized as a plain array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DnfGenome {
    bits: Vec<bool>,
}

impl DnfGenome {
    #[must_use]
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    #[must_use]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }
}

/// [`Evaluator`] for [`DnfGenome`] candidates.
///
/// The bit layout is derived from the problem's variables on [`Evaluator::initialise`]:
/// the labels of variable 0 come first, then those of variable 1, and so on.
#[derive(Debug, Clone)]
pub struct FuzzyPatternEvaluator {
    objectives: Objectives,
    problem: Option<Arc<dyn Problem>>,
    /// Bit range of each variable inside a genome.
    spans: Vec<Range<usize>>,
}

impl FuzzyPatternEvaluator {
    pub const NAME: &'static str = "dnf_fuzzy";

    /// Creates an unbound evaluator scoring with `objectives`.
    #[must_use]
    pub fn new(objectives: Objectives) -> Self {
        Self {
            objectives,
            problem: None,
            spans: vec![],
        }
    }

    /// Number of bits a genome must have for the bound problem.
    ///
    /// # Panics
    ///
    /// Panics if called before [`Evaluator::initialise`].
    #[must_use]
    pub fn genome_len(&self) -> usize {
        self.assert_initialised();
        self.spans.last().map_or(0, |span| span.end)
    }

    fn assert_initialised(&self) {
        assert!(
            self.problem.is_some(),
            "{} evaluator used before initialise",
            Self::NAME
        );
    }

    fn variable_bits<'a>(&self, candidate: &'a DnfGenome, variable: usize) -> Option<&'a [bool]> {
        let span = self.spans.get(variable)?;
        Some(&candidate.bits[span.clone()])
    }

    fn check_layout(&self, candidate: &DnfGenome) {
        assert_eq!(
            candidate.bits.len(),
            self.genome_len(),
            "DNF genome length does not match the problem's label layout"
        );
    }
}

impl Evaluator for FuzzyPatternEvaluator {
    type Candidate = DnfGenome;

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
        let mut offset = 0;
        let spans = problem
            .variables()
            .iter()
            .map(|v| {
                let span = offset..offset + v.num_labels();
                offset = span.end;
                span
            })
            .collect();
        evaluator::bind_problem(Self::NAME, &mut self.problem, problem)?;
        self.spans = spans;
        Ok(())
    }

    fn is_empty(&self, candidate: &DnfGenome) -> bool {
        self.check_layout(candidate);
        (0..self.spans.len()).all(|v| !self.participates(candidate, v))
    }

    fn participates(&self, candidate: &DnfGenome, variable: usize) -> bool {
        self.check_layout(candidate);
        self.variable_bits(candidate, variable)
            .is_some_and(|bits| bits.contains(&true) && bits.contains(&false))
    }
}
