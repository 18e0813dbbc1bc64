use crate::reports;
use clap::Args;
use slotforge::config::Config;
use slotforge::error::SfResult;
use slotforge::grid::Grid;
use slotforge::pipeline::{SlottingPipeline, Strategy};
use std::time::Instant;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub config: Config,

    /// full | inertia | affinity | pareto-critical
    #[arg(short, long, default_value_t = Strategy::Full)]
    pub strategy: Strategy,

    /// Comma-separated positions that are frequently picked together
    #[arg(long = "affinity-group")]
    pub affinity_groups: Vec<String>,

    /// Print the statistics as JSON instead of tables
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Print the swap sequence of the applied moves
    #[arg(long, default_value_t = false)]
    pub steps: bool,
}

pub fn run(args: OptimizeArgs, config: Config, grid: Grid) -> SfResult<()> {
    let affinity =
        super::build_affinity(&grid, &args.affinity_groups, config.weights.affinity_weight)?;
    let pipeline = SlottingPipeline::new(config);

    let start = Instant::now();
    let outcome = pipeline.run(args.strategy, &grid, affinity.as_ref())?;
    info!(
        "⏱️  '{}' finished in {:.2?}",
        args.strategy,
        start.elapsed()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.stats)?);
        return Ok(());
    }

    reports::print_layout_grid("Original", &grid, outcome.inertial_mask.as_ref());
    reports::print_layout_grid(&args.strategy.to_string(), &outcome.grid, None);
    reports::print_stats_report(&format!("Stats ({})", args.strategy), &outcome.stats);

    if args.strategy == Strategy::ParetoCritical {
        reports::print_movement_report(&outcome.critical_movements);
    }
    if args.steps {
        reports::print_swap_steps(&outcome.swap_steps);
    }
    Ok(())
}
