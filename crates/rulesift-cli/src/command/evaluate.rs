use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::Utc;
use rulesift_evaluator::{
    config::{EngineConfig, Representation},
    evaluator::Evaluator,
    fuzzy::DnfGenome,
    list_evaluator::{BatchEvaluation, ListEvaluator, SequentialListEvaluator},
    rule::RuleGenome,
};
use serde::de::DeserializeOwned;

use crate::{
    schema::{CandidateRecord, CandidateReport, EvaluationReport, ObjectiveInfo},
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Engine configuration file
    #[arg(long)]
    config: PathBuf,
    /// Candidates file: a JSON list of `{ "genome": ..., "table": ... }` records
    #[arg(long)]
    input: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Evaluate on the calling thread only
    #[arg(long)]
    sequential: bool,
    /// Report failing candidates instead of aborting on the first one
    #[arg(long)]
    skip_invalid: bool,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let config = util::read_config_file(&arg.config)?;
    let report = match config.representation {
        Representation::Rule => {
            let evaluator = config.build_rule_evaluator()?;
            let num_variables = config.problem.variables.len();
            evaluate_file(&config, &evaluator, arg, |genome: &RuleGenome| {
                genome.genes().len() == num_variables
            })?
        }
        Representation::Fuzzy => {
            let evaluator = config.build_fuzzy_evaluator()?;
            let genome_len = evaluator.genome_len();
            evaluate_file(&config, &evaluator, arg, |genome: &DnfGenome| {
                genome.bits().len() == genome_len
            })?
        }
    };

    let summary = &report.summary;
    eprintln!(
        "Evaluated {} candidates: {} failed, {} empty patterns",
        summary.evaluated, summary.failed, summary.empty_patterns
    );
    for (info, objective) in report.objectives.iter().zip(&summary.objectives) {
        eprintln!(
            "  {:<20} min {:>9.4} max {:>9.4} mean {:>9.4}",
            info.id,
            objective.min().unwrap_or(f64::NAN),
            objective.max().unwrap_or(f64::NAN),
            objective.mean().unwrap_or(f64::NAN),
        );
    }

    Output::save_json(&report, arg.output.clone())?;
    if let Some(path) = &arg.output {
        eprintln!("Report saved to {}", path.display());
    }
    Ok(())
}

fn evaluate_file<E, F>(
    config: &EngineConfig,
    evaluator: &E,
    arg: &EvaluateArg,
    layout_matches: F,
) -> anyhow::Result<EvaluationReport>
where
    E: Evaluator,
    E::Candidate: DeserializeOwned,
    F: Fn(&E::Candidate) -> bool,
{
    let records: Vec<CandidateRecord<E::Candidate>> =
        util::read_json_file("candidates", &arg.input)?;
    if let Some(index) = records.iter().position(|r| !layout_matches(&r.genome)) {
        bail!(
            "candidate #{index} does not match the layout of problem '{}'",
            config.problem.name
        );
    }
    let batch = records
        .into_iter()
        .map(|r| (r.genome, r.table))
        .collect::<Vec<_>>();

    let parallel = config.parallel_list_evaluator();
    let list_evaluator: &dyn ListEvaluator<E> = if arg.sequential {
        &SequentialListEvaluator
    } else {
        &parallel
    };
    eprintln!(
        "Evaluating {} candidates with {} ({})...",
        batch.len(),
        evaluator.name(),
        if arg.sequential { "sequential" } else { "tree reduce" }
    );
    let evaluation = list_evaluator.evaluate(evaluator, &batch)?;
    check_failures(&evaluation, arg.skip_invalid)?;

    Ok(EvaluationReport {
        evaluated_at: Utc::now(),
        representation: config.representation,
        problem: config.problem.name.clone(),
        objectives: evaluator.objectives().iter().map(ObjectiveInfo::new).collect(),
        candidates: evaluation
            .outcomes()
            .iter()
            .enumerate()
            .map(|(index, outcome)| CandidateReport::new(index, outcome))
            .collect(),
        summary: evaluation.summary().clone(),
    })
}

fn check_failures(evaluation: &BatchEvaluation, skip_invalid: bool) -> anyhow::Result<()> {
    let Some(err) = evaluation.first_error() else {
        return Ok(());
    };
    if !skip_invalid {
        let index = evaluation
            .outcomes()
            .iter()
            .position(Result::is_err)
            .unwrap_or_default();
        return Err(err.clone()).with_context(|| format!("Failed to evaluate candidate #{index}"));
    }
    eprintln!(
        "Skipping {} invalid candidates (first: {err})",
        evaluation.summary().failed
    );
    Ok(())
}
