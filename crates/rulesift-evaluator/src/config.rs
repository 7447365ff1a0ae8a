//! JSON configuration of an evaluation run.
//!
//! ```json
//! {
//!   "representation": "rule",
//!   "objectives": ["coverage", "confidence"],
//!   "problem": {
//!     "name": "weather",
//!     "variables": [{ "name": "outlook", "labels": ["sunny", "overcast", "rainy"] }],
//!     "num_examples": 14
//!   },
//!   "evaluation": { "max_depth": 20, "sequential_threshold": 64 }
//! }
//! ```
//!
//! `evaluation` and each of its fields may be omitted, as may the problem's `class_labels`
//! and `num_examples`. When `num_examples` is given, every scored table must sum to it.

use std::sync::Arc;

use rulesift_measures::MeasureKind;
use serde::{Deserialize, Serialize};

use crate::{
    EvaluationError,
    evaluator::Evaluator,
    fuzzy::FuzzyPatternEvaluator,
    list_evaluator::TreeReduceListEvaluator,
    objectives::Objectives,
    problem::{PatternProblem, Problem},
    rule::RuleEvaluator,
    tree_reduce::TreeReduceConfig,
};

/// Pattern representation the candidates are encoded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// Canonical rules, evaluated by [`RuleEvaluator`]
    #[display("rule")]
    Rule,
    /// DNF fuzzy patterns, evaluated by [`FuzzyPatternEvaluator`]
    #[display("fuzzy")]
    Fuzzy,
}

/// Everything needed to set up an evaluation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub representation: Representation,
    /// Objectives in the order the optimizer receives them
    pub objectives: Vec<MeasureKind>,
    pub problem: PatternProblem,
    /// Parallel batch evaluation tuning
    #[serde(default)]
    pub evaluation: TreeReduceConfig,
}

impl EngineConfig {
    /// Fresh objective templates for the configured measures.
    #[must_use]
    pub fn objectives(&self) -> Objectives {
        Objectives::from_kinds(&self.objectives)
    }

    fn shared_problem(&self) -> Arc<dyn Problem> {
        Arc::new(self.problem.clone())
    }

    /// Builds an initialised canonical-rule evaluator.
    pub fn build_rule_evaluator(&self) -> Result<RuleEvaluator, EvaluationError> {
        let mut evaluator = RuleEvaluator::new(self.objectives());
        evaluator.initialise(self.shared_problem())?;
        Ok(evaluator)
    }

    /// Builds an initialised DNF fuzzy evaluator.
    pub fn build_fuzzy_evaluator(&self) -> Result<FuzzyPatternEvaluator, EvaluationError> {
        let mut evaluator = FuzzyPatternEvaluator::new(self.objectives());
        evaluator.initialise(self.shared_problem())?;
        Ok(evaluator)
    }

    #[must_use]
    pub fn parallel_list_evaluator(&self) -> TreeReduceListEvaluator {
        TreeReduceListEvaluator::new(self.evaluation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_reduce::{SEQUENTIAL_THRESHOLD, TREE_REDUCE_DEPTH};

    const CONFIG: &str = r#"{
        "representation": "fuzzy",
        "objectives": ["support", "false_positive_rate"],
        "problem": {
            "name": "iris",
            "variables": [
                { "name": "petal_length", "labels": ["low", "medium", "high"] },
                { "name": "petal_width", "labels": ["low", "high"] }
            ],
            "class_labels": ["setosa", "versicolor", "virginica"]
        },
        "evaluation": { "sequential_threshold": 8 }
    }"#;

    #[test]
    fn test_parse_config() {
        let config: EngineConfig = serde_json::from_str(CONFIG).unwrap();
        assert_eq!(config.representation, Representation::Fuzzy);
        assert_eq!(
            config.objectives,
            [MeasureKind::Support, MeasureKind::FalsePositiveRate]
        );
        assert_eq!(config.evaluation.max_depth, TREE_REDUCE_DEPTH);
        assert_eq!(config.evaluation.sequential_threshold, 8);
        assert_eq!(config.parallel_list_evaluator().config(), config.evaluation);
    }

    #[test]
    fn test_evaluation_section_is_optional() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"representation":"rule","objectives":["lift"],
                "problem":{"name":"p","variables":[{"name":"x","labels":["a"]}]}}"#,
        )
        .unwrap();
        assert_eq!(config.evaluation.sequential_threshold, SEQUENTIAL_THRESHOLD);
    }

    #[test]
    fn test_unknown_measure_is_rejected() {
        let json = CONFIG.replace("false_positive_rate", "interest");
        assert!(serde_json::from_str::<EngineConfig>(&json).is_err());
    }

    #[test]
    fn test_builders_initialise() {
        let config: EngineConfig = serde_json::from_str(CONFIG).unwrap();
        let fuzzy = config.build_fuzzy_evaluator().unwrap();
        assert_eq!(fuzzy.genome_len(), 5);
        assert_eq!(fuzzy.objectives().len(), 2);
        let rule = config.build_rule_evaluator().unwrap();
        assert_eq!(rule.problem().map(|p| p.name()), Some("iris"));
    }

    #[test]
    fn test_builders_reject_problem_without_variables() {
        let mut config: EngineConfig = serde_json::from_str(CONFIG).unwrap();
        config.problem.variables.clear();
        assert_eq!(
            config.build_rule_evaluator().unwrap_err(),
            EvaluationError::EmptyProblem {
                problem: "iris".to_owned()
            }
        );
    }
}
