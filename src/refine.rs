//! Post-assignment affinity refinement.
//!
//! The assignment solver cannot see pairwise terms, so after it has placed
//! items by frequency this greedy hill-climb nudges high-affinity pairs
//! together with local swaps, as long as the operational cost stays inside
//! a fixed budget relative to where the refinement started.

use crate::affinity::{AffinityMatrix, AffinityPair};
use crate::config::Config;
use crate::consts::{
    DEFAULT_AFFINITY_PAIR_THRESHOLD, DEFAULT_MAX_COST_INCREASE_PCT,
    DEFAULT_MAX_REFINE_ITERATIONS, DEFAULT_NEIGHBORHOOD_RADIUS, TRACTABLE_POSITIONS,
};
use crate::cost::{euclidean_distance, total_cost};
use crate::error::{SfResult, SlotForgeError};
use crate::grid::Grid;
use crate::stats::{pct, Stats};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct RefineParams {
    #[builder(default = 1.0)]
    pub affinity_weight: f64,
    #[builder(default = DEFAULT_MAX_COST_INCREASE_PCT)]
    pub max_cost_increase_pct: f64,
    #[builder(default = DEFAULT_MAX_REFINE_ITERATIONS)]
    pub max_iterations: usize,
    #[builder(default = DEFAULT_NEIGHBORHOOD_RADIUS)]
    pub radius: usize,
    #[builder(default = DEFAULT_AFFINITY_PAIR_THRESHOLD)]
    pub pair_threshold: f64,
}

impl Default for RefineParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl From<&Config> for RefineParams {
    fn from(cfg: &Config) -> Self {
        Self {
            affinity_weight: cfg.weights.affinity_weight,
            max_cost_increase_pct: cfg.thresholds.max_cost_increase_pct,
            max_iterations: cfg.search.max_refine_iterations,
            radius: cfg.search.neighborhood_radius,
            pair_threshold: cfg.thresholds.affinity_pair_threshold,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefineStats {
    pub swaps: usize,
    pub iterations: usize,
    pub initial_cost: f64,
    pub final_cost: f64,
    pub initial_affinity_penalty: f64,
    pub final_affinity_penalty: f64,
}

impl RefineStats {
    pub fn initial_score(&self) -> f64 {
        self.initial_cost + self.initial_affinity_penalty
    }

    pub fn final_score(&self) -> f64 {
        self.final_cost + self.final_affinity_penalty
    }

    pub fn to_stats(&self) -> Stats {
        let cost_increase = self.final_cost - self.initial_cost;
        let affinity_improvement = self.initial_affinity_penalty - self.final_affinity_penalty;

        let mut s = Stats::new();
        s.insert_count("swaps", self.swaps);
        s.insert_count("iterations", self.iterations);
        s.insert("initial_cost", self.initial_cost);
        s.insert("final_cost", self.final_cost);
        s.insert("cost_increase", cost_increase);
        s.insert("cost_increase_pct", pct(cost_increase, self.initial_cost));
        s.insert("initial_affinity_penalty", self.initial_affinity_penalty);
        s.insert("final_affinity_penalty", self.final_affinity_penalty);
        s.insert("affinity_improvement", affinity_improvement);
        s.insert(
            "affinity_improvement_pct",
            pct(affinity_improvement, self.initial_affinity_penalty),
        );
        s.insert("initial_score", self.initial_score());
        s.insert("final_score", self.final_score());
        s.insert("total_improvement", self.initial_score() - self.final_score());
        s
    }
}

#[derive(Debug, Clone)]
pub struct RefineOutcome {
    pub grid: Grid,
    pub stats: RefineStats,
}

/// Positions within Chebyshev distance `radius` of `pos`, clipped to the
/// grid, row-major, centre excluded. A radius wider than the grid covers the
/// whole grid.
pub fn neighbors(pos: usize, rows: usize, cols: usize, radius: usize) -> Vec<usize> {
    let (row, col) = (pos / cols, pos % cols);
    let radius = radius.min(rows.max(cols));
    let row_end = row.saturating_add(radius).saturating_add(1).min(rows);
    let col_end = col.saturating_add(radius).saturating_add(1).min(cols);
    let mut out = Vec::with_capacity((row_end - row.saturating_sub(radius)) * cols);

    for r in row.saturating_sub(radius)..row_end {
        for c in col.saturating_sub(radius)..col_end {
            let p = r * cols + c;
            if p != pos {
                out.push(p);
            }
        }
    }
    out
}

/// `sum(affinity * distance * weight)` over every pair with affinity > 0,
/// measured between the pair's current positions.
pub fn affinity_penalty(grid: &Grid, affinity: &AffinityMatrix, weight: f64) -> f64 {
    pair_penalty(grid, &affinity.pairs_exceeding(0.0), weight)
}

/// Operational cost plus affinity penalty.
pub fn combined_score(grid: &Grid, affinity: &AffinityMatrix, weight: f64) -> f64 {
    total_cost(grid) + affinity_penalty(grid, affinity, weight)
}

fn pair_penalty(grid: &Grid, pairs: &[AffinityPair], weight: f64) -> f64 {
    pairs
        .iter()
        .filter_map(|p| {
            let pa = grid.position_of(p.a)?;
            let pb = grid.position_of(p.b)?;
            Some(p.affinity * euclidean_distance(pa, pb, grid.cols()) * weight)
        })
        .sum()
}

/// Candidate found while scanning one pair's neighbourhoods.
struct SwapCandidate {
    a: usize,
    b: usize,
    score: f64,
}

/// Greedy affinity hill-climb over `grid`.
///
/// Each outer iteration walks the pairs with affinity above the threshold
/// from strongest to weakest. For the first pair that admits an improving
/// move, the best swap across both members' neighbourhoods (left member
/// first) is applied and pair selection restarts. A swap is accepted only
/// if the operational cost stays within `initial * (1 + pct / 100)`, the
/// combined score strictly drops, and the moved member strictly closes in
/// on its partner. Stops on the first iteration without a swap or at the
/// iteration cap.
pub fn refine_affinity(
    grid: &Grid,
    affinity: &AffinityMatrix,
    params: &RefineParams,
) -> SfResult<RefineOutcome> {
    if affinity.size() != grid.len() {
        return Err(SlotForgeError::Shape(format!(
            "Affinity matrix is {}x{} but the grid has {} positions",
            affinity.size(),
            affinity.size(),
            grid.len()
        )));
    }
    if grid.len() > TRACTABLE_POSITIONS {
        warn!(
            "Affinity refinement over {} positions exceeds the tuned bound of {}",
            grid.len(),
            TRACTABLE_POSITIONS
        );
    }

    let (rows, cols) = (grid.rows(), grid.cols());
    let weight = params.affinity_weight;
    let scored_pairs = affinity.pairs_exceeding(0.0);

    let mut priority = affinity.pairs_exceeding(params.pair_threshold);
    priority.sort_by(|x, y| y.affinity.total_cmp(&x.affinity));

    let mut current = grid.clone();
    let initial_cost = total_cost(&current);
    let initial_penalty = pair_penalty(&current, &scored_pairs, weight);
    let max_allowed_cost = initial_cost * (1.0 + params.max_cost_increase_pct / 100.0);

    let mut swaps = 0usize;
    let mut iterations = 0usize;
    let mut improved = true;

    while improved && iterations < params.max_iterations {
        improved = false;
        iterations += 1;

        let current_score = total_cost(&current) + pair_penalty(&current, &scored_pairs, weight);

        for pair in &priority {
            let (Some(pos_i), Some(pos_j)) =
                (current.position_of(pair.a), current.position_of(pair.b))
            else {
                continue;
            };
            let current_distance = euclidean_distance(pos_i, pos_j, cols);

            let mut probe = current.clone();
            let mut best: Option<SwapCandidate> = None;
            let mut best_score = current_score;

            // (moved position, anchor position): pull j next to i, then i next to j.
            for (moved, anchor) in [(pos_j, pos_i), (pos_i, pos_j)] {
                for n in neighbors(anchor, rows, cols, params.radius) {
                    probe.swap_in_place(moved, n);

                    let new_cost = total_cost(&probe);
                    if new_cost <= max_allowed_cost {
                        let new_score = new_cost + pair_penalty(&probe, &scored_pairs, weight);
                        let new_distance = euclidean_distance(anchor, n, cols);

                        if new_score < best_score && new_distance < current_distance {
                            best_score = new_score;
                            best = Some(SwapCandidate {
                                a: moved,
                                b: n,
                                score: new_score,
                            });
                        }
                    }

                    probe.swap_in_place(moved, n);
                }
            }

            if let Some(swap) = best {
                current.swap_in_place(swap.a, swap.b);
                swaps += 1;
                improved = true;
                debug!(
                    "Refine it {}: swap {} <-> {} (score {:.2})",
                    iterations, swap.a, swap.b, swap.score
                );
                break;
            }
        }
    }

    let stats = RefineStats {
        swaps,
        iterations,
        initial_cost,
        final_cost: total_cost(&current),
        initial_affinity_penalty: initial_penalty,
        final_affinity_penalty: pair_penalty(&current, &scored_pairs, weight),
    };

    Ok(RefineOutcome {
        grid: current,
        stats,
    })
}
