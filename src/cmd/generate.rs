use clap::Args;
use slotforge::consts::{GRID_COLS, GRID_ROWS};
use slotforge::error::SfResult;
use slotforge::generator::random_grid;
use slotforge::loader::write_grid_csv;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(short, long)]
    pub out: String,

    #[arg(long, default_value_t = GRID_ROWS)]
    pub rows: usize,

    #[arg(long, default_value_t = GRID_COLS)]
    pub cols: usize,
}

pub fn run(args: GenerateArgs, seed: Option<u64>) -> SfResult<()> {
    let mut rng = match seed {
        Some(s) => fastrand::Rng::with_seed(s),
        None => fastrand::Rng::new(),
    };
    let grid = random_grid(args.rows, args.cols, &mut rng)?;
    write_grid_csv(&grid, &args.out)?;
    info!("💾 Wrote {}x{} grid to {}", args.rows, args.cols, args.out);
    Ok(())
}
