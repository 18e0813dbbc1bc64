//! Movement ledger and Pareto selection of critical moves.

use crate::core_types::{Classification, ItemId};
use crate::cost::{position_cost, total_cost};
use crate::error::{SfResult, SlotForgeError};
use crate::grid::Grid;
use crate::stats::{pct, Stats};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One item's transition between two layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub item: ItemId,
    pub class: Classification,
    pub score: u32,
    pub original_position: usize,
    pub optimized_position: usize,
    pub original_row: usize,
    pub optimized_row: usize,
    pub original_cost: f64,
    pub optimized_cost: f64,
    pub gain: f64,
    pub gain_pct: f64,
}

/// Every item that moved between `original` and `optimized`, sorted by raw
/// gain, largest first. Equal gains keep original-position order.
pub fn compute_gains(original: &Grid, optimized: &Grid) -> SfResult<Vec<MovementRecord>> {
    if !original.same_shape(optimized) {
        return Err(SlotForgeError::Shape(
            "Cannot compare layouts of different shapes".to_string(),
        ));
    }

    let mut movements = Vec::new();
    for (from, slot) in original.slots().iter().enumerate() {
        let to = optimized.position_of(slot.id).ok_or_else(|| {
            SlotForgeError::Validation(format!(
                "Item {:?} is missing from the optimized layout",
                slot.id
            ))
        })?;
        if from == to {
            continue;
        }

        let score = slot.score as f64;
        let original_row = original.row_of(from);
        let optimized_row = optimized.row_of(to);
        let original_cost = position_cost(original_row, score);
        let optimized_cost = position_cost(optimized_row, score);
        let gain = original_cost - optimized_cost;

        movements.push(MovementRecord {
            item: slot.id,
            class: slot.class,
            score: slot.score,
            original_position: from,
            optimized_position: to,
            original_row,
            optimized_row,
            original_cost,
            optimized_cost,
            gain,
            gain_pct: pct(gain, original_cost),
        });
    }

    movements.sort_by(|a, b| b.gain.total_cmp(&a.gain));
    Ok(movements)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParetoStats {
    pub total_movements: usize,
    pub critical_movements: usize,
    /// Sum of the positive gains: what the selector can actually collect.
    pub total_gain: f64,
    /// Sum of every gain, negative ones included.
    pub net_gain: f64,
    pub critical_gain: f64,
    pub target_percentage: f64,
}

impl ParetoStats {
    pub fn critical_percentage(&self) -> f64 {
        if self.total_movements > 0 {
            self.critical_movements as f64 / self.total_movements as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn critical_gain_percentage(&self) -> f64 {
        pct(self.critical_gain, self.total_gain)
    }

    pub fn to_stats(&self) -> Stats {
        let mut s = Stats::new();
        s.insert_count("total_movements", self.total_movements);
        s.insert_count("critical_movements", self.critical_movements);
        s.insert("critical_percentage", self.critical_percentage());
        s.insert("total_gain", self.total_gain);
        s.insert("net_gain", self.net_gain);
        s.insert("critical_gain", self.critical_gain);
        s.insert("critical_gain_percentage", self.critical_gain_percentage());
        s.insert("target_percentage", self.target_percentage);
        s
    }
}

/// Shortest gain-ordered prefix of `movements` whose cumulative gain reaches
/// `target_pct` percent of the available (positive) gain.
///
/// `movements` must already be sorted as `compute_gains` returns them.
/// A non-positive target selects nothing. Without any positive gain to
/// collect the selection is empty and the stats are zeroed.
pub fn select_critical_movements(
    movements: &[MovementRecord],
    target_pct: f64,
) -> (Vec<MovementRecord>, ParetoStats) {
    let total_gain: f64 = movements.iter().map(|m| m.gain).filter(|&g| g > 0.0).sum();
    let net_gain: f64 = movements.iter().map(|m| m.gain).sum();

    if total_gain <= 0.0 {
        let stats = ParetoStats {
            target_percentage: target_pct,
            ..Default::default()
        };
        return (Vec::new(), stats);
    }

    let target_gain = total_gain * (target_pct / 100.0);
    let mut critical = Vec::new();
    let mut accumulated = 0.0;

    for movement in movements {
        if accumulated >= target_gain {
            break;
        }
        critical.push(movement.clone());
        accumulated += movement.gain;
    }

    let stats = ParetoStats {
        total_movements: movements.len(),
        critical_movements: critical.len(),
        total_gain,
        net_gain,
        critical_gain: accumulated,
        target_percentage: target_pct,
    };

    debug!(
        "Pareto: {}/{} moves collect {:.1}% of {:.1} available gain",
        stats.critical_movements,
        stats.total_movements,
        stats.critical_gain_percentage(),
        total_gain
    );

    (critical, stats)
}

/// One pairwise exchange performed while replaying critical moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapStep {
    pub step: usize,
    pub item: ItemId,
    pub from: usize,
    pub to: usize,
    /// Item displaced from `to` back into `from`.
    pub displaced: ItemId,
    pub gain: f64,
}

/// Replays `critical` on a copy of `original`, one swap per movement that
/// still needs it, and returns the resulting layout with the steps taken.
pub fn swap_plan(original: &Grid, critical: &[MovementRecord]) -> SfResult<(Grid, Vec<SwapStep>)> {
    let mut grid = original.clone();
    let mut steps = Vec::new();

    for movement in critical {
        let target = movement.optimized_position;
        if target >= grid.len() {
            return Err(SlotForgeError::Validation(format!(
                "Movement target {} is outside the grid",
                target
            )));
        }
        let current = grid.position_of(movement.item).ok_or_else(|| {
            SlotForgeError::Validation(format!("Item {:?} is not in the grid", movement.item))
        })?;
        if current == target {
            continue;
        }

        let displaced = grid.slot(target).id;
        grid.swap_in_place(current, target);
        steps.push(SwapStep {
            step: steps.len() + 1,
            item: movement.item,
            from: current,
            to: target,
            displaced,
            gain: movement.gain,
        });
    }

    Ok((grid, steps))
}

/// Applies only the critical movements, starting from the original layout.
/// Every change is a pairwise swap, so no item is lost or duplicated.
pub fn apply_critical_movements(original: &Grid, critical: &[MovementRecord]) -> SfResult<Grid> {
    swap_plan(original, critical).map(|(grid, _)| grid)
}

/// Costs and gains of the original, fully optimized and critical-only
/// layouts side by side.
pub fn comparative_stats(
    original: &Grid,
    optimized: &Grid,
    critical_layout: &Grid,
    pareto: &ParetoStats,
) -> Stats {
    let original_cost = total_cost(original);
    let optimized_cost = total_cost(optimized);
    let critical_cost = total_cost(critical_layout);

    let optimized_gain = original_cost - optimized_cost;
    let critical_gain = original_cost - critical_cost;
    let critical_pct = pareto.critical_percentage();

    let mut s = Stats::new();
    s.insert("original_cost", original_cost);
    s.insert("optimized_cost", optimized_cost);
    s.insert("pareto_critical_cost", critical_cost);
    s.insert("optimized_gain", optimized_gain);
    s.insert("pareto_critical_gain", critical_gain);
    s.insert("optimized_improvement_pct", pct(optimized_gain, original_cost));
    s.insert(
        "pareto_critical_improvement_pct",
        pct(critical_gain, original_cost),
    );
    s.insert("efficiency_ratio", pct(critical_gain, optimized_gain));
    s.insert_count("total_possible_movements", pareto.total_movements);
    s.insert_count("critical_movements_count", pareto.critical_movements);
    s.insert("critical_movements_pct", critical_pct);
    s.insert_count(
        "movements_avoided",
        pareto.total_movements - pareto.critical_movements,
    );
    s.insert("movements_avoided_pct", 100.0 - critical_pct);
    s.insert("target_percentage", pareto.target_percentage);
    s
}
