use std::{path::PathBuf, time::Instant};

use anyhow::bail;
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use rulesift_evaluator::{
    config::{EngineConfig, Representation},
    evaluator::Evaluator,
    fuzzy::DnfGenome,
    list_evaluator::{ListEvaluator, SequentialListEvaluator},
    rule::RuleGenome,
};
use rulesift_measures::ContingencyTable;

use crate::util;

/// Upper bound (exclusive) of each randomly drawn contingency count.
const MAX_COUNT: u64 = 500;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct StressArg {
    /// Engine configuration file
    #[arg(long)]
    config: PathBuf,
    /// Number of random candidates to evaluate
    #[arg(long, default_value_t = 10_000)]
    count: usize,
    /// Random seed; drawn from the OS when omitted
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &StressArg) -> anyhow::Result<()> {
    let config = util::read_config_file(&arg.config)?;
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    eprintln!("Seed: {seed}");
    let mut rng = Pcg32::seed_from_u64(seed);

    match config.representation {
        Representation::Rule => {
            let evaluator = config.build_rule_evaluator()?;
            let label_counts = config
                .problem
                .variables
                .iter()
                .map(|v| u32::try_from(v.num_labels()).unwrap_or(u32::MAX))
                .collect::<Vec<_>>();
            // a gene equal to the label count leaves the variable out
            let batch = random_batch(arg.count, config.problem.num_examples, &mut rng, |rng| {
                RuleGenome::new(label_counts.iter().map(|n| rng.random_range(0..=*n)).collect())
            });
            compare(&config, &evaluator, &batch)
        }
        Representation::Fuzzy => {
            let evaluator = config.build_fuzzy_evaluator()?;
            let genome_len = evaluator.genome_len();
            let batch = random_batch(arg.count, config.problem.num_examples, &mut rng, |rng| {
                DnfGenome::new((0..genome_len).map(|_| rng.random()).collect())
            });
            compare(&config, &evaluator, &batch)
        }
    }
}

fn random_batch<G, F>(
    count: usize,
    num_examples: Option<u64>,
    rng: &mut Pcg32,
    mut genome: F,
) -> Vec<(G, ContingencyTable)>
where
    F: FnMut(&mut Pcg32) -> G,
{
    (0..count)
        .map(|_| {
            let genome = genome(rng);
            let table = match num_examples {
                Some(total) => partition(rng, total),
                None => ContingencyTable::new(
                    rng.random_range(0..MAX_COUNT),
                    rng.random_range(0..MAX_COUNT),
                    rng.random_range(1..MAX_COUNT),
                    rng.random_range(0..MAX_COUNT),
                ),
            };
            (genome, table)
        })
        .collect()
}

/// A random table whose counts sum to `total`.
fn partition(rng: &mut Pcg32, total: u64) -> ContingencyTable {
    let mut cuts = [
        rng.random_range(0..=total),
        rng.random_range(0..=total),
        rng.random_range(0..=total),
    ];
    cuts.sort_unstable();
    let [a, b, c] = cuts;
    ContingencyTable::new(a, b - a, c - b, total - c)
}

fn compare<E>(
    config: &EngineConfig,
    evaluator: &E,
    batch: &[(E::Candidate, ContingencyTable)],
) -> anyhow::Result<()>
where
    E: Evaluator,
{
    eprintln!("Evaluating {} random candidates sequentially...", batch.len());
    let start = Instant::now();
    let sequential = SequentialListEvaluator.evaluate(evaluator, batch)?;
    let sequential_elapsed = start.elapsed();

    let parallel_evaluator = config.parallel_list_evaluator();
    eprintln!(
        "Evaluating {} random candidates with tree reduce (depth {}, threshold {})...",
        batch.len(),
        config.evaluation.max_depth,
        config.evaluation.sequential_threshold
    );
    let start = Instant::now();
    let parallel = parallel_evaluator.evaluate(evaluator, batch)?;
    let parallel_elapsed = start.elapsed();

    eprintln!("  Sequential:  {sequential_elapsed:.3?}");
    eprintln!("  Tree reduce: {parallel_elapsed:.3?}");
    eprintln!(
        "  Failed: {}, empty patterns: {}",
        parallel.summary().failed,
        parallel.summary().empty_patterns
    );

    if let Some(index) = sequential
        .outcomes()
        .iter()
        .zip(parallel.outcomes())
        .position(|(s, p)| s != p)
    {
        bail!("parallel evaluation differs from sequential evaluation at candidate #{index}");
    }
    if sequential.outcomes().len() != parallel.outcomes().len() {
        bail!(
            "parallel evaluation returned {} outcomes, expected {}",
            parallel.outcomes().len(),
            sequential.outcomes().len()
        );
    }
    eprintln!("Parallel and sequential evaluation agree");
    Ok(())
}
