//! Strategy orchestration: cost matrix -> solver -> optional inertia
//! re-solve -> optional affinity refinement or Pareto-critical filtering.

use crate::affinity::AffinityMatrix;
use crate::config::Config;
use crate::cost::{build_cost_matrix, CostMatrix};
use crate::error::{SfResult, SlotForgeError};
use crate::grid::Grid;
use crate::inertia::{apply_inertia_constraint, identify_inertial_items, InertialMask};
use crate::ledger::{
    compute_gains, comparative_stats, select_critical_movements, swap_plan, MovementRecord,
    SwapStep,
};
use crate::refine::{refine_affinity, RefineParams};
use crate::solver::{AssignmentSolver, HungarianSolver};
use crate::stats::{optimization_stats, Stats};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Strategy {
    /// Unconstrained minimum-cost assignment.
    Full,
    /// Two-pass assignment that pins low-gain items in place.
    #[strum(to_string = "inertia")]
    InertiaConstrained,
    /// Unconstrained assignment followed by affinity swaps.
    #[strum(to_string = "affinity")]
    AffinityRefined,
    /// Inertia layout filtered down to its Pareto-critical moves.
    ParetoCritical,
}

#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    pub strategy: Strategy,
    pub grid: Grid,
    pub stats: Stats,
    pub inertial_mask: Option<InertialMask>,
    pub critical_movements: Vec<MovementRecord>,
    pub swap_steps: Vec<SwapStep>,
}

impl StrategyOutcome {
    fn new(strategy: Strategy, grid: Grid, stats: Stats) -> Self {
        Self {
            strategy,
            grid,
            stats,
            inertial_mask: None,
            critical_movements: Vec::new(),
            swap_steps: Vec::new(),
        }
    }
}

pub struct SlottingPipeline<S: AssignmentSolver = HungarianSolver> {
    config: Config,
    solver: S,
}

impl SlottingPipeline<HungarianSolver> {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            solver: HungarianSolver,
        }
    }
}

impl<S: AssignmentSolver> SlottingPipeline<S> {
    pub fn with_solver(config: Config, solver: S) -> Self {
        Self { config, solver }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(
        &self,
        strategy: Strategy,
        grid: &Grid,
        affinity: Option<&AffinityMatrix>,
    ) -> SfResult<StrategyOutcome> {
        self.config.validate()?;
        if let Some(aff) = affinity {
            if aff.size() != grid.len() {
                return Err(SlotForgeError::Shape(format!(
                    "Affinity matrix is {}x{} but the grid has {} positions",
                    aff.size(),
                    aff.size(),
                    grid.len()
                )));
            }
        }

        let outcome = match strategy {
            Strategy::Full => self.full(grid, affinity),
            Strategy::InertiaConstrained => self.inertia_constrained(grid, affinity),
            Strategy::AffinityRefined => self.affinity_refined(grid, affinity),
            Strategy::ParetoCritical => self.pareto_critical(grid, affinity),
        }?;

        info!(
            "Strategy '{}' done: cost {:.0} -> {:.0}",
            strategy,
            crate::cost::total_cost(grid),
            crate::cost::total_cost(&outcome.grid)
        );
        Ok(outcome)
    }

    /// Cost matrix -> solve -> reconstruct.
    pub fn full(&self, grid: &Grid, affinity: Option<&AffinityMatrix>) -> SfResult<StrategyOutcome> {
        let costs = build_cost_matrix(grid, affinity, self.config.weights.affinity_weight)?;
        let optimized = self.solve_layout(grid, &costs)?;
        let stats = optimization_stats(grid, &optimized);
        Ok(StrategyOutcome::new(Strategy::Full, optimized, stats))
    }

    /// Solve once to measure per-item gains, flag the inertial items, then
    /// re-solve with their moves penalized.
    pub fn inertia_constrained(
        &self,
        grid: &Grid,
        affinity: Option<&AffinityMatrix>,
    ) -> SfResult<StrategyOutcome> {
        let (layout, mask) = self.inertia_layout(grid, affinity)?;

        let mut stats = optimization_stats(grid, &layout);
        stats.insert_count("inertial_count", mask.count());

        let mut outcome = StrategyOutcome::new(Strategy::InertiaConstrained, layout, stats);
        outcome.inertial_mask = Some(mask);
        Ok(outcome)
    }

    /// Frequency-only assignment, then affinity swaps when there is an
    /// affinity matrix and a positive weight.
    pub fn affinity_refined(
        &self,
        grid: &Grid,
        affinity: Option<&AffinityMatrix>,
    ) -> SfResult<StrategyOutcome> {
        let costs = build_cost_matrix(grid, None, 0.0)?;
        let assigned = self.solve_layout(grid, &costs)?;

        let (layout, refine_stats) = match affinity {
            Some(aff) if self.config.weights.affinity_weight > 0.0 => {
                let params = RefineParams::from(&self.config);
                let refined = refine_affinity(&assigned, aff, &params)?;
                (refined.grid, refined.stats.to_stats())
            }
            _ => {
                let mut s = Stats::new();
                s.insert_count("swaps", 0);
                s.insert("improvement", 0.0);
                (assigned, s)
            }
        };

        let mut stats = optimization_stats(grid, &layout);
        stats.merge(refine_stats);
        Ok(StrategyOutcome::new(Strategy::AffinityRefined, layout, stats))
    }

    /// Inertia layout, then only the moves that collect the configured share
    /// of its gain, replayed as swaps on the original grid.
    pub fn pareto_critical(
        &self,
        grid: &Grid,
        affinity: Option<&AffinityMatrix>,
    ) -> SfResult<StrategyOutcome> {
        let (inertia_layout, mask) = self.inertia_layout(grid, affinity)?;

        let movements = compute_gains(grid, &inertia_layout)?;
        let (critical, pareto) =
            select_critical_movements(&movements, self.config.thresholds.critical_gain_pct);
        let (layout, steps) = swap_plan(grid, &critical)?;

        let mut stats = comparative_stats(grid, &inertia_layout, &layout, &pareto);
        stats.insert_count("inertial_count", mask.count());
        stats.insert_count("applied_movements", critical.len());

        debug!(
            "Pareto-critical: {} of {} moves kept, {} swaps",
            critical.len(),
            movements.len(),
            steps.len()
        );

        let mut outcome = StrategyOutcome::new(Strategy::ParetoCritical, layout, stats);
        outcome.inertial_mask = Some(mask);
        outcome.critical_movements = critical;
        outcome.swap_steps = steps;
        Ok(outcome)
    }

    fn inertia_layout(
        &self,
        grid: &Grid,
        affinity: Option<&AffinityMatrix>,
    ) -> SfResult<(Grid, InertialMask)> {
        let costs = build_cost_matrix(grid, affinity, self.config.weights.affinity_weight)?;
        let unconstrained = self.solve_layout(grid, &costs)?;

        let mask = identify_inertial_items(
            grid,
            &unconstrained,
            self.config.thresholds.gain_threshold_pct,
        )?;
        let constrained =
            apply_inertia_constraint(&costs, &mask, self.config.weights.inertia_penalty)?;

        let layout = self.solve_layout(grid, &constrained)?;
        Ok((layout, mask))
    }

    fn solve_layout(&self, grid: &Grid, costs: &CostMatrix) -> SfResult<Grid> {
        if costs.size() != grid.len() {
            return Err(SlotForgeError::Shape(format!(
                "Cost matrix is {}x{} but the grid has {} positions",
                costs.size(),
                costs.size(),
                grid.len()
            )));
        }
        let assignment = self.solver.solve(costs);
        grid.apply_assignment(&assignment)
    }
}
