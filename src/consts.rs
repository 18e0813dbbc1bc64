/// Warehouse depth. Row 0 is the row nearest the entrance.
pub const GRID_ROWS: usize = 10;

/// Warehouse width.
pub const GRID_COLS: usize = 10;

/// Number of slots in the standard grid (R x C).
pub const GRID_POSITIONS: usize = GRID_ROWS * GRID_COLS;

/// Largest position count the affinity-aware cost matrix and the local
/// search are sized for. Both grow super-linearly (pairs x positions and
/// pairs x neighbourhood x grid respectively); past this bound they still
/// run but are logged as out of the tuned range.
pub const TRACTABLE_POSITIONS: usize = GRID_POSITIONS;

/// Importance used for a slot when only the classification is known.
pub const DEFAULT_SCORE_A: u32 = 85;
pub const DEFAULT_SCORE_B: u32 = 60;
pub const DEFAULT_SCORE_C: u32 = 25;

/// Inclusive importance ranges used by the synthetic generator.
pub const SCORE_RANGE_A: (u32, u32) = (70, 100);
pub const SCORE_RANGE_B: (u32, u32) = (50, 69);
pub const SCORE_RANGE_C: (u32, u32) = (1, 49);

/// Added to every off-diagonal placement of an inertial item.
/// Tuned to the magnitude of the cost formula at 10x10, not a universal bound.
pub const DEFAULT_INERTIA_PENALTY: f64 = 1000.0;

/// Items whose relocation gain (%) falls below this are inertial.
pub const DEFAULT_GAIN_THRESHOLD_PCT: f64 = 5.0;

/// Share of the available gain the Pareto selector aims for.
pub const DEFAULT_CRITICAL_GAIN_PCT: f64 = 50.0;

/// Budget on operational cost growth during affinity refinement.
pub const DEFAULT_MAX_COST_INCREASE_PCT: f64 = 2.0;

pub const DEFAULT_MAX_REFINE_ITERATIONS: usize = 100;

/// Chebyshev radius of the swap neighbourhood (2 => 5x5 square).
pub const DEFAULT_NEIGHBORHOOD_RADIUS: usize = 2;

/// A neighbourhood this wide already spans every grid within the tractable
/// bound; larger radii are rejected by config validation.
pub const MAX_NEIGHBORHOOD_RADIUS: usize = TRACTABLE_POSITIONS;

/// Pairs at or below this affinity are ignored by the refinement.
pub const DEFAULT_AFFINITY_PAIR_THRESHOLD: f64 = 0.1;

/// Affinity assigned between members of a user-selected group.
pub const DEFAULT_GROUP_AFFINITY: f64 = 0.6;
