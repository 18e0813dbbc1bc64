use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use slotforge::config::Config;
use slotforge::consts::{GRID_COLS, GRID_ROWS};
use slotforge::error::{SfResult, SlotForgeError};
use slotforge::generator::random_grid;
use slotforge::grid::Grid;
use slotforge::loader::load_grid_csv;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Grid CSV (row,col,class,score). A random grid is used when absent.
    #[arg(global = true, short, long)]
    grid: Option<String>,

    /// Seed for the random grid
    #[arg(global = true, long)]
    seed: Option<u64>,

    /// JSON config file; explicit flags override its values
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Optimize(cmd::optimize::OptimizeArgs),
    Compare(cmd::compare::CompareArgs),
    Generate(cmd::generate::GenerateArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute(cli, &matches) {
        error!("❌ {}", e);
        process::exit(1);
    }
}

fn execute(cli: Cli, matches: &ArgMatches) -> SfResult<()> {
    let sub_matches = matches
        .subcommand()
        .map(|(_, m)| m)
        .ok_or_else(|| SlotForgeError::Config("No command given".to_string()))?;

    match cli.command {
        Commands::Generate(args) => cmd::generate::run(args, cli.seed),
        Commands::Optimize(args) => {
            let config = resolve_config(&args.config, cli.config.as_deref(), sub_matches)?;
            let grid = load_or_generate(cli.grid.as_deref(), cli.seed)?;
            cmd::optimize::run(args, config, grid)
        }
        Commands::Compare(args) => {
            let config = resolve_config(&args.config, cli.config.as_deref(), sub_matches)?;
            let grid = load_or_generate(cli.grid.as_deref(), cli.seed)?;
            cmd::compare::run(args, config, grid)
        }
    }
}

fn resolve_config(
    cli_config: &Config,
    path: Option<&str>,
    sub_matches: &ArgMatches,
) -> SfResult<Config> {
    let config = match path {
        Some(p) => {
            info!("⚖️  Loading config from: {}", p);
            let mut file_config = Config::load_from_file(p)?;
            file_config.merge_from_cli(cli_config, sub_matches);
            file_config
        }
        None => cli_config.clone(),
    };
    config.validate()?;
    Ok(config)
}

fn load_or_generate(path: Option<&str>, seed: Option<u64>) -> SfResult<Grid> {
    if let Some(p) = path {
        info!("📂 Loading grid: {}", p);
        return load_grid_csv(p);
    }

    let mut rng = match seed {
        Some(s) => fastrand::Rng::with_seed(s),
        None => fastrand::Rng::new(),
    };
    info!("🎲 No grid given, generating {}x{}", GRID_ROWS, GRID_COLS);
    random_grid(GRID_ROWS, GRID_COLS, &mut rng)
}
