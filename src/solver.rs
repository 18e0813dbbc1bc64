//! Linear assignment seam.
//!
//! The pipeline only needs *a* minimum-cost perfect matching for a square
//! cost matrix; which one among equal-cost optima is returned is up to the
//! solver. `HungarianSolver` is the bundled dense O(n^3) implementation.

use crate::cost::matrix::CostMatrix;

/// A bijection rows -> columns. For a slotting cost matrix, row `i` is the
/// item currently at position `i` and the column is its new position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    targets: Vec<usize>,
}

impl Assignment {
    pub fn from_targets(targets: Vec<usize>) -> Self {
        Self { targets }
    }

    pub fn identity(n: usize) -> Self {
        Self {
            targets: (0..n).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[inline(always)]
    pub fn target(&self, row: usize) -> usize {
        self.targets[row]
    }

    /// `(row, column)` pairs in row order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.targets.iter().copied().enumerate()
    }

    pub fn total_cost(&self, costs: &CostMatrix) -> f64 {
        self.pairs().map(|(i, j)| costs.get(i, j)).sum()
    }
}

pub trait AssignmentSolver: Send + Sync {
    fn solve(&self, costs: &CostMatrix) -> Assignment;
}

/// Shortest augmenting path Hungarian algorithm with potentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver;

impl AssignmentSolver for HungarianSolver {
    fn solve(&self, costs: &CostMatrix) -> Assignment {
        let n = costs.size();
        if n == 0 {
            return Assignment::from_targets(Vec::new());
        }

        let inf = f64::INFINITY;
        // 1-based with a sentinel column 0
        let mut u = vec![0.0f64; n + 1];
        let mut v = vec![0.0f64; n + 1];
        let mut p = vec![0usize; n + 1];
        let mut way = vec![0usize; n + 1];
        let mut minv = vec![inf; n + 1];
        let mut used = vec![false; n + 1];

        for i in 1..=n {
            p[0] = i;
            let mut j0 = 0usize;
            minv.fill(inf);
            used.fill(false);

            loop {
                used[j0] = true;
                let i0 = p[j0];
                let row = costs.row(i0 - 1);
                let mut delta = inf;
                let mut j1 = 0usize;

                for j in 1..=n {
                    if used[j] {
                        continue;
                    }
                    let cur = row[j - 1] - u[i0] - v[j];
                    if cur < minv[j] {
                        minv[j] = cur;
                        way[j] = j0;
                    }
                    if minv[j] < delta {
                        delta = minv[j];
                        j1 = j;
                    }
                }

                for j in 0..=n {
                    if used[j] {
                        u[p[j]] += delta;
                        v[j] -= delta;
                    } else {
                        minv[j] -= delta;
                    }
                }

                j0 = j1;
                if p[j0] == 0 {
                    break;
                }
            }

            loop {
                let j1 = way[j0];
                p[j0] = p[j1];
                j0 = j1;
                if j0 == 0 {
                    break;
                }
            }
        }

        let mut targets = vec![0usize; n];
        for j in 1..=n {
            if p[j] > 0 {
                targets[p[j] - 1] = j - 1;
            }
        }
        Assignment::from_targets(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_small_assignment() {
        let costs = CostMatrix::from_rows(vec![
            vec![4.0, 1.0, 3.0],
            vec![2.0, 0.0, 5.0],
            vec![3.0, 2.0, 2.0],
        ])
        .unwrap();

        let assignment = HungarianSolver.solve(&costs);
        assert_eq!(assignment.len(), 3);
        assert!((assignment.total_cost(&costs) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn result_is_a_permutation() {
        let n = 12;
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| (0..n).map(|j| ((i * 7 + j * 13) % 11) as f64 + 0.5).collect())
            .collect();
        let costs = CostMatrix::from_rows(rows).unwrap();

        let assignment = HungarianSolver.solve(&costs);
        let mut cols: Vec<usize> = assignment.pairs().map(|(_, j)| j).collect();
        cols.sort();
        assert_eq!(cols, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn empty_matrix_yields_empty_assignment() {
        let costs = CostMatrix::zeros(0);
        assert!(HungarianSolver.solve(&costs).is_empty());
    }
}
