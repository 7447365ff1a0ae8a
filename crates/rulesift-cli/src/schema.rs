use chrono::{DateTime, Utc};
use rulesift_evaluator::{
    EvaluationError, config::Representation, list_evaluator::CandidateEvaluation,
    summary::BatchSummary,
};
use rulesift_measures::{ContingencyTable, QualityMeasure, Sense};
use serde::{Deserialize, Serialize};

/// A candidate to evaluate, paired with the table it produced on the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord<G> {
    pub genome: G,
    pub table: ContingencyTable,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveInfo {
    pub id: String,
    pub name: String,
    pub sense: Sense,
    pub range: String,
}

impl ObjectiveInfo {
    pub fn new(measure: &dyn QualityMeasure) -> Self {
        Self {
            id: measure.id().to_owned(),
            name: measure.name().to_owned(),
            sense: measure.sense(),
            range: measure.range().to_string(),
        }
    }
}

/// Result for one input record, in input order.
///
/// Non-finite values serialize as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateReport {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_pattern: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective_values: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CandidateReport {
    pub fn new(index: usize, outcome: &Result<CandidateEvaluation, EvaluationError>) -> Self {
        match outcome {
            Ok(evaluation) => Self {
                index,
                empty_pattern: Some(evaluation.is_empty_pattern()),
                values: Some(evaluation.values().collect()),
                objective_values: Some(evaluation.objective_values().collect()),
                error: None,
            },
            Err(err) => Self {
                index,
                empty_pattern: None,
                values: None,
                objective_values: None,
                error: Some(err.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub evaluated_at: DateTime<Utc>,
    pub representation: Representation,
    pub problem: String,
    pub objectives: Vec<ObjectiveInfo>,
    pub candidates: Vec<CandidateReport>,
    pub summary: BatchSummary,
}
