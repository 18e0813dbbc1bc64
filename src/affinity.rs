use crate::core_types::ItemId;
use crate::error::{SfResult, SlotForgeError};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Co-purchase strength between two items, `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffinityPair {
    pub a: ItemId,
    pub b: ItemId,
    pub affinity: f64,
}

/// Symmetric item x item affinity with a zero diagonal and entries in [0, 1].
/// Indexed by `ItemId`, i.e. by position in the grid the ids were minted on.
#[derive(Debug, Clone, PartialEq)]
pub struct AffinityMatrix {
    n: usize,
    data: Vec<f64>,
}

impl AffinityMatrix {
    pub fn empty(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Every pair of positions inside each group gets `value`.
    pub fn from_groups(n: usize, groups: &[Vec<usize>], value: f64) -> SfResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(SlotForgeError::Validation(format!(
                "Affinity value {} is outside [0, 1]",
                value
            )));
        }
        let mut m = Self::empty(n);
        for group in groups {
            if let Some(&bad) = group.iter().find(|&&p| p >= n) {
                return Err(SlotForgeError::Validation(format!(
                    "Affinity group references position {} but only {} exist",
                    bad, n
                )));
            }
            for (&i, &j) in group.iter().tuple_combinations() {
                if i != j {
                    m.set(i, j, value);
                }
            }
        }
        Ok(m)
    }

    /// Validates a dense matrix: square, symmetric, zero diagonal, [0, 1].
    pub fn from_rows(rows: Vec<Vec<f64>>) -> SfResult<Self> {
        let n = rows.len();
        if rows.iter().any(|r| r.len() != n) {
            return Err(SlotForgeError::Shape(
                "Affinity matrix must be square".to_string(),
            ));
        }

        for i in 0..n {
            if rows[i][i] != 0.0 {
                return Err(SlotForgeError::Validation(format!(
                    "Affinity diagonal must be zero (entry {} is {})",
                    i, rows[i][i]
                )));
            }
            for j in 0..n {
                let v = rows[i][j];
                if !(0.0..=1.0).contains(&v) {
                    return Err(SlotForgeError::Validation(format!(
                        "Affinity [{}, {}] = {} is outside [0, 1]",
                        i, j, v
                    )));
                }
                if v != rows[j][i] {
                    return Err(SlotForgeError::Validation(format!(
                        "Affinity matrix is not symmetric at [{}, {}]",
                        i, j
                    )));
                }
            }
        }

        Ok(Self {
            n,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Real purchase-history ingestion is not available yet.
    pub fn load_from_purchase_data<P: AsRef<Path>>(path: P) -> SfResult<Self> {
        Err(SlotForgeError::NotImplemented(format!(
            "affinity ingestion from purchase data ({})",
            path.as_ref().display()
        )))
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Writes both `[i, j]` and `[j, i]`.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
        self.data[j * self.n + i] = value;
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }

    /// Pairs with affinity `>= threshold`, in `(a, b)` order.
    pub fn pairs_at_least(&self, threshold: f64) -> Vec<AffinityPair> {
        self.collect_pairs(|v| v >= threshold)
    }

    /// Pairs with affinity `> threshold`, in `(a, b)` order.
    pub fn pairs_exceeding(&self, threshold: f64) -> Vec<AffinityPair> {
        self.collect_pairs(|v| v > threshold)
    }

    fn collect_pairs<F: Fn(f64) -> bool>(&self, keep: F) -> Vec<AffinityPair> {
        (0..self.n)
            .tuple_combinations()
            .filter_map(|(i, j)| {
                let v = self.get(i, j);
                keep(v).then_some(AffinityPair {
                    a: ItemId(i as u32),
                    b: ItemId(j as u32),
                    affinity: v,
                })
            })
            .collect()
    }
}

/// Parses `5,12,23` into a position group.
pub fn parse_group(s: &str) -> SfResult<Vec<usize>> {
    s.split(',')
        .map(|p| {
            p.trim().parse::<usize>().map_err(|_| {
                SlotForgeError::Config(format!("Invalid position '{}' in group '{}'", p, s))
            })
        })
        .collect()
}
