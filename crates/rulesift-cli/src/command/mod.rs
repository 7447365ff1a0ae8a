use clap::{Parser, Subcommand};

use self::{evaluate::EvaluateArg, measures::MeasuresArg, stress::StressArg};

mod evaluate;
mod measures;
mod stress;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// List the available quality measures
    Measures(#[clap(flatten)] MeasuresArg),
    /// Evaluate a list of candidates against the configured objectives
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Check parallel evaluation against sequential evaluation on random candidates
    Stress(#[clap(flatten)] StressArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Measures(arg) => measures::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Stress(arg) => stress::run(&arg)?,
    }
    Ok(())
}
