mod grid;
mod tables;

pub use self::grid::print_layout as print_layout_grid;
pub use self::tables::{
    comparison as print_comparison_report, movements as print_movement_report,
    stats as print_stats_report, swap_steps as print_swap_steps,
};
