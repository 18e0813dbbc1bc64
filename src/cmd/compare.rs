use crate::reports;
use clap::Args;
use rayon::prelude::*;
use slotforge::config::Config;
use slotforge::error::SfResult;
use slotforge::grid::Grid;
use slotforge::pipeline::{SlottingPipeline, Strategy};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(long = "affinity-group")]
    pub affinity_groups: Vec<String>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: CompareArgs, config: Config, grid: Grid) -> SfResult<()> {
    let affinity =
        super::build_affinity(&grid, &args.affinity_groups, config.weights.affinity_weight)?;
    let pipeline = SlottingPipeline::new(config);

    let strategies: Vec<Strategy> = Strategy::iter().collect();
    info!("🔥 Running {} strategies", strategies.len());

    let outcomes = strategies
        .par_iter()
        .map(|&s| pipeline.run(s, &grid, affinity.as_ref()))
        .collect::<SfResult<Vec<_>>>()?;

    if args.json {
        let by_name: BTreeMap<String, _> = outcomes
            .iter()
            .map(|o| (o.strategy.to_string(), &o.stats))
            .collect();
        println!("{}", serde_json::to_string_pretty(&by_name)?);
        return Ok(());
    }

    reports::print_layout_grid("Original", &grid, None);
    reports::print_comparison_report(&grid, &outcomes);
    Ok(())
}
