use crate::consts::{DEFAULT_SCORE_A, DEFAULT_SCORE_B, DEFAULT_SCORE_C};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// ABC pick-frequency class of an item.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Classification {
    A,
    B,
    C,
}

impl Classification {
    /// Importance used when no explicit score grid is supplied.
    pub fn default_score(&self) -> u32 {
        match self {
            Self::A => DEFAULT_SCORE_A,
            Self::B => DEFAULT_SCORE_B,
            Self::C => DEFAULT_SCORE_C,
        }
    }
}

/// Stable identity of an item.
///
/// Assigned once when a grid is created from raw data (the linear position
/// the item occupied at that time) and carried through every swap and
/// permutation. Affinity matrices are indexed by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl ItemId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One occupied warehouse location. Classification and score belong to the
/// item and always travel together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: ItemId,
    pub class: Classification,
    pub score: u32,
}

impl Slot {
    /// Short label used by the reports, e.g. `A85`.
    pub fn label(&self) -> String {
        format!("{}{}", self.class, self.score)
    }
}

#[inline(always)]
pub fn to_row_col(index: usize, cols: usize) -> (usize, usize) {
    (index / cols, index % cols)
}

#[inline(always)]
pub fn to_index(row: usize, col: usize, cols: usize) -> usize {
    row * cols + col
}
