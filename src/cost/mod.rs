//! Cost model: travel distance x pick frequency x logarithmic amplification.

pub mod matrix;

pub use self::matrix::{build_cost_matrix, CostMatrix};

use crate::core_types::to_row_col;
use crate::grid::Grid;

/// Travel distance of a row from the entrance. The entrance row pays unit
/// distance, deeper rows pay `row + 1`.
#[inline(always)]
pub fn row_distance(row: usize) -> f64 {
    if row == 0 {
        1.0
    } else {
        (row + 1) as f64
    }
}

/// `log10(score + 1) + 1`. Always >= 1, grows slowly so that very frequent
/// items do not dominate without bound.
#[inline(always)]
pub fn importance_factor(score: f64) -> f64 {
    (score + 1.0).log10() + 1.0
}

/// Cost of holding an item of the given importance in `row`.
///
/// Strictly increasing in `row` for a fixed positive score and strictly
/// increasing in `score` for a fixed row.
#[inline(always)]
pub fn position_cost(row: usize, score: f64) -> f64 {
    row_distance(row) * score * importance_factor(score)
}

/// Straight-line distance between two linear positions.
#[inline(always)]
pub fn euclidean_distance(a: usize, b: usize, cols: usize) -> f64 {
    let (r1, c1) = to_row_col(a, cols);
    let (r2, c2) = to_row_col(b, cols);
    let dr = r1 as f64 - r2 as f64;
    let dc = c1 as f64 - c2 as f64;
    (dr * dr + dc * dc).sqrt()
}

/// Sum of `position_cost` over every occupied cell.
pub fn total_cost(grid: &Grid) -> f64 {
    grid.slots()
        .iter()
        .enumerate()
        .map(|(pos, slot)| position_cost(grid.row_of(pos), slot.score as f64))
        .sum()
}

/// Per-position costs in row-major order (heatmap feed for the reports).
pub fn element_costs(grid: &Grid) -> Vec<f64> {
    grid.slots()
        .iter()
        .enumerate()
        .map(|(pos, slot)| position_cost(grid.row_of(pos), slot.score as f64))
        .collect()
}
