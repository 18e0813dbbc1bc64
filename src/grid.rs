use crate::core_types::{to_row_col, Classification, ItemId, Slot};
use crate::error::{SfResult, SlotForgeError};
use crate::solver::Assignment;
use serde::{Deserialize, Serialize};

/// A warehouse layout: `rows x cols` slots in row-major order plus the
/// reverse index from item id to current position.
///
/// Grids are values. Every transformation returns a new grid and leaves the
/// receiver untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridData", into = "GridData")]
pub struct Grid {
    rows: usize,
    cols: usize,
    slots: Vec<Slot>,
    index: Vec<usize>,
}

#[derive(Serialize, Deserialize)]
struct GridData {
    rows: usize,
    cols: usize,
    slots: Vec<Slot>,
}

impl TryFrom<GridData> for Grid {
    type Error = SlotForgeError;

    fn try_from(data: GridData) -> SfResult<Self> {
        Grid::from_slots(data.rows, data.cols, data.slots)
    }
}

impl From<Grid> for GridData {
    fn from(grid: Grid) -> Self {
        GridData {
            rows: grid.rows,
            cols: grid.cols,
            slots: grid.slots,
        }
    }
}

impl Grid {
    /// Builds a grid from flat, row-major classification and importance data.
    /// Item ids are the positions the items occupy here.
    pub fn new(
        rows: usize,
        cols: usize,
        classes: Vec<Classification>,
        scores: Vec<u32>,
    ) -> SfResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(SlotForgeError::Shape(format!(
                "Grid dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }
        let n = rows * cols;
        if classes.len() != n {
            return Err(SlotForgeError::Shape(format!(
                "Expected {} classifications for a {}x{} grid, got {}",
                n,
                rows,
                cols,
                classes.len()
            )));
        }
        if scores.len() != n {
            return Err(SlotForgeError::Shape(format!(
                "Classification grid has {} cells but importance grid has {}",
                n,
                scores.len()
            )));
        }

        let slots = classes
            .into_iter()
            .zip(scores)
            .enumerate()
            .map(|(pos, (class, score))| Slot {
                id: ItemId(pos as u32),
                class,
                score,
            })
            .collect();

        Ok(Self {
            rows,
            cols,
            slots,
            index: (0..n).collect(),
        })
    }

    /// Builds a grid from nested row vectors, checking both are rectangular
    /// and of the same shape.
    pub fn from_matrices(classes: &[Vec<Classification>], scores: &[Vec<u32>]) -> SfResult<Self> {
        let rows = classes.len();
        let cols = classes.first().map(|r| r.len()).unwrap_or(0);

        if classes.iter().any(|r| r.len() != cols) {
            return Err(SlotForgeError::Shape(
                "Classification grid is ragged".to_string(),
            ));
        }
        if scores.len() != rows || scores.iter().any(|r| r.len() != cols) {
            return Err(SlotForgeError::Shape(format!(
                "Importance grid does not match the {}x{} classification grid",
                rows, cols
            )));
        }

        Self::new(
            rows,
            cols,
            classes.iter().flatten().copied().collect(),
            scores.iter().flatten().copied().collect(),
        )
    }

    /// Builds a grid without an importance grid: every item takes its
    /// classification's default score.
    pub fn from_classifications(
        rows: usize,
        cols: usize,
        classes: Vec<Classification>,
    ) -> SfResult<Self> {
        let scores = classes.iter().map(|c| c.default_score()).collect();
        Self::new(rows, cols, classes, scores)
    }

    /// Rebuilds a grid from already-identified slots (e.g. deserialized data).
    /// Ids must be a permutation of `0..rows*cols`.
    pub fn from_slots(rows: usize, cols: usize, slots: Vec<Slot>) -> SfResult<Self> {
        let n = rows * cols;
        if n == 0 || slots.len() != n {
            return Err(SlotForgeError::Shape(format!(
                "Expected {} slots for a {}x{} grid, got {}",
                n,
                rows,
                cols,
                slots.len()
            )));
        }

        let mut index = vec![usize::MAX; n];
        for (pos, slot) in slots.iter().enumerate() {
            let id = slot.id.index();
            if id >= n || index[id] != usize::MAX {
                return Err(SlotForgeError::Validation(format!(
                    "Item id {} at position {} is out of range or duplicated",
                    id, pos
                )));
            }
            index[id] = pos;
        }

        Ok(Self {
            rows,
            cols,
            slots,
            index,
        })
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline(always)]
    pub fn slot(&self, pos: usize) -> &Slot {
        &self.slots[pos]
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Current position of an item, `None` if the id is not part of this grid.
    #[inline(always)]
    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        self.index.get(id.index()).copied()
    }

    #[inline(always)]
    pub fn row_of(&self, pos: usize) -> usize {
        pos / self.cols
    }

    pub fn coords(&self, pos: usize) -> (usize, usize) {
        to_row_col(pos, self.cols)
    }

    pub fn same_shape(&self, other: &Grid) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    pub fn classification_matrix(&self) -> Vec<Vec<Classification>> {
        self.slots
            .chunks(self.cols)
            .map(|row| row.iter().map(|s| s.class).collect())
            .collect()
    }

    pub fn score_matrix(&self) -> Vec<Vec<u32>> {
        self.slots
            .chunks(self.cols)
            .map(|row| row.iter().map(|s| s.score).collect())
            .collect()
    }

    /// Sorted multiset of (classification, score). Equal for any two grids
    /// that are permutations of each other.
    pub fn content_fingerprint(&self) -> Vec<(Classification, u32)> {
        let mut items: Vec<_> = self.slots.iter().map(|s| (s.class, s.score)).collect();
        items.sort();
        items
    }

    /// Number of items whose position differs from `other`.
    pub fn displaced_count(&self, other: &Grid) -> usize {
        self.slots
            .iter()
            .enumerate()
            .filter(|(pos, s)| other.position_of(s.id) != Some(*pos))
            .count()
    }

    /// Copy of this grid with the items at `a` and `b` exchanged.
    pub fn swapped(&self, a: usize, b: usize) -> Grid {
        let mut next = self.clone();
        next.swap_in_place(a, b);
        next
    }

    pub(crate) fn swap_in_place(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.slots.swap(a, b);
        self.index[self.slots[a].id.index()] = a;
        self.index[self.slots[b].id.index()] = b;
    }

    /// Moves the item at position `i` to `assignment.target(i)` for every `i`.
    pub fn apply_assignment(&self, assignment: &Assignment) -> SfResult<Grid> {
        let n = self.len();
        if assignment.len() != n {
            return Err(SlotForgeError::Shape(format!(
                "Assignment covers {} rows but the grid has {} positions",
                assignment.len(),
                n
            )));
        }

        let mut placed: Vec<Option<Slot>> = vec![None; n];
        for (from, to) in assignment.pairs() {
            if to >= n || placed[to].is_some() {
                return Err(SlotForgeError::Validation(format!(
                    "Assignment is not a bijection (column {} reused or out of range)",
                    to
                )));
            }
            placed[to] = Some(self.slots[from]);
        }

        let slots = placed.into_iter().flatten().collect();
        Grid::from_slots(self.rows, self.cols, slots)
    }
}
