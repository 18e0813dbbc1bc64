use super::{euclidean_distance, position_cost};
use crate::affinity::AffinityMatrix;
use crate::consts::TRACTABLE_POSITIONS;
use crate::error::{SfResult, SlotForgeError};
use crate::grid::Grid;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Dense row-major square matrix. Entry `[i, j]` is the cost of placing the
/// item currently at position `i` into position `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    n: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> SfResult<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(SlotForgeError::Shape(format!(
                    "Cost matrix must be square: row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            if let Some(bad) = row.iter().find(|v| !v.is_finite()) {
                return Err(SlotForgeError::Validation(format!(
                    "Cost matrix row {} contains non-finite value {}",
                    i, bad
                )));
            }
            data.extend(row);
        }
        Ok(Self { n, data })
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    #[inline(always)]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    #[inline(always)]
    pub(crate) fn add(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] += value;
    }
}

/// Builds the item x position cost matrix for `grid`.
///
/// The base term depends only on the target row and the item's own score.
/// With an affinity matrix and a positive weight, every item pair `(i, j)`
/// with affinity `a > 0` adds `a * d(p, q) * weight / 2` to `[i, p]` and to
/// `[j, q]` for every placement pair `(p, q)`. Summed over `q` that is
/// `a * weight / 2 * sum_q d(p, q)`, so the quartic loop collapses to one
/// distance pass plus one term per pair.
pub fn build_cost_matrix(
    grid: &Grid,
    affinity: Option<&AffinityMatrix>,
    affinity_weight: f64,
) -> SfResult<CostMatrix> {
    let n = grid.len();
    let cols = grid.cols();

    let affinity = match affinity {
        Some(aff) if affinity_weight > 0.0 => {
            if aff.size() != n {
                return Err(SlotForgeError::Shape(format!(
                    "Affinity matrix is {}x{} but the grid has {} positions",
                    aff.size(),
                    aff.size(),
                    n
                )));
            }
            Some(aff)
        }
        _ => None,
    };

    // Per-row affinity strength and per-target distance mass.
    let mut strength = vec![0.0f64; n];
    let mut dist_sums = vec![0.0f64; n];

    if let Some(aff) = affinity {
        if n > TRACTABLE_POSITIONS {
            warn!(
                "Affinity-aware cost matrix over {} positions exceeds the tuned bound of {}",
                n, TRACTABLE_POSITIONS
            );
        }

        let mut pair_count = 0usize;
        for pair in aff.pairs_exceeding(0.0) {
            let (Some(pi), Some(pj)) = (grid.position_of(pair.a), grid.position_of(pair.b)) else {
                continue;
            };
            strength[pi] += pair.affinity;
            strength[pj] += pair.affinity;
            pair_count += 1;
        }

        dist_sums
            .par_iter_mut()
            .enumerate()
            .for_each(|(p, sum)| {
                *sum = (0..n).map(|q| euclidean_distance(p, q, cols)).sum();
            });

        debug!(
            "Cost matrix: {} affinity pairs, weight {:.3}",
            pair_count, affinity_weight
        );
    }

    let half_weight = affinity_weight / 2.0;
    let mut matrix = CostMatrix::zeros(n);

    matrix
        .data
        .par_chunks_mut(n.max(1))
        .enumerate()
        .for_each(|(i, row)| {
            let score = grid.slot(i).score as f64;
            let pull = half_weight * strength[i];
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = position_cost(j / cols, score);
                if pull > 0.0 {
                    *cell += pull * dist_sums[j];
                }
            }
        });

    Ok(matrix)
}
