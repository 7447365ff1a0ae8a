use std::path::PathBuf;

use rulesift_measures::MeasureKind;

use crate::{schema::ObjectiveInfo, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct MeasuresArg {
    /// Write the catalogue as JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Output file path for the JSON catalogue
    #[arg(long, requires = "json")]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &MeasuresArg) -> anyhow::Result<()> {
    let MeasuresArg { json, output } = arg;
    let catalogue = MeasureKind::ALL
        .iter()
        .map(|kind| ObjectiveInfo::new(&*kind.build()))
        .collect::<Vec<_>>();

    if *json {
        return Output::save_json(&catalogue, output.clone());
    }

    println!("{:<20} {:<20} {:<14} SENSE", "ID", "NAME", "RANGE");
    for info in &catalogue {
        println!(
            "{:<20} {:<20} {:<14} {}",
            info.id, info.name, info.range, info.sense
        );
    }
    Ok(())
}
