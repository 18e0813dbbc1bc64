use crate::cost::{position_cost, CostMatrix};
use crate::error::{SfResult, SlotForgeError};
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One flag per original position: `true` when moving the item there is
/// not worth the churn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InertialMask {
    rows: usize,
    cols: usize,
    flags: Vec<bool>,
}

impl InertialMask {
    pub fn none(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            flags: vec![false; rows * cols],
        }
    }

    pub fn from_flags(rows: usize, cols: usize, flags: Vec<bool>) -> SfResult<Self> {
        if flags.len() != rows * cols {
            return Err(SlotForgeError::Shape(format!(
                "Mask has {} flags, expected {}",
                flags.len(),
                rows * cols
            )));
        }
        Ok(Self { rows, cols, flags })
    }

    #[inline(always)]
    pub fn is_inertial(&self, pos: usize) -> bool {
        self.flags[pos]
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    pub fn as_matrix(&self) -> Vec<Vec<bool>> {
        self.flags.chunks(self.cols).map(|r| r.to_vec()).collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}

/// Relocation gain of an item moving from `from_row` to `to_row`:
/// `(gain, gain_pct)`. The percentage is 0 when the original cost is 0.
pub fn relocation_gain(from_row: usize, to_row: usize, score: f64) -> (f64, f64) {
    let original = position_cost(from_row, score);
    let candidate = position_cost(to_row, score);
    let gain = original - candidate;
    let pct = if original > 0.0 {
        gain / original * 100.0
    } else {
        0.0
    };
    (gain, pct)
}

/// Flags every item of `original` whose move to its place in `candidate`
/// would gain less than `gain_threshold_pct` percent. Items that do not move
/// gain nothing and are therefore inertial for any positive threshold.
pub fn identify_inertial_items(
    original: &Grid,
    candidate: &Grid,
    gain_threshold_pct: f64,
) -> SfResult<InertialMask> {
    if !original.same_shape(candidate) {
        return Err(SlotForgeError::Shape(format!(
            "Candidate grid is {}x{}, original is {}x{}",
            candidate.rows(),
            candidate.cols(),
            original.rows(),
            original.cols()
        )));
    }

    let mut flags = vec![false; original.len()];
    for (pos, slot) in original.slots().iter().enumerate() {
        let target = candidate.position_of(slot.id).ok_or_else(|| {
            SlotForgeError::Validation(format!(
                "Item {:?} from position {} is missing in the candidate grid",
                slot.id, pos
            ))
        })?;

        let (_, gain_pct) = relocation_gain(
            original.row_of(pos),
            candidate.row_of(target),
            slot.score as f64,
        );
        flags[pos] = gain_pct < gain_threshold_pct;
    }

    let mask = InertialMask::from_flags(original.rows(), original.cols(), flags)?;
    debug!(
        "Inertia: {} of {} items below {:.1}% gain",
        mask.count(),
        mask.len(),
        gain_threshold_pct
    );
    Ok(mask)
}

/// Adds `penalty` to every placement of an inertial item except staying put.
/// The penalty only binds if it exceeds the largest cost delta a move could
/// save; callers pick it accordingly.
pub fn apply_inertia_constraint(
    costs: &CostMatrix,
    mask: &InertialMask,
    penalty: f64,
) -> SfResult<CostMatrix> {
    let n = costs.size();
    if mask.len() != n {
        return Err(SlotForgeError::Shape(format!(
            "Inertial mask covers {} positions but the cost matrix is {}x{}",
            mask.len(),
            n,
            n
        )));
    }

    let mut adjusted = costs.clone();
    for item in (0..n).filter(|&i| mask.is_inertial(i)) {
        for pos in (0..n).filter(|&p| p != item) {
            adjusted.add(item, pos, penalty);
        }
    }
    Ok(adjusted)
}
