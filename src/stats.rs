use crate::core_types::Classification;
use crate::cost::total_cost;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// String-keyed statistics handed to the reporting layer. Key names are part
/// of the public contract; counts are stored as floats like every other value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stats(BTreeMap<String, f64>);

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, value: f64) {
        self.0.insert(key.into(), value);
    }

    pub fn insert_count<K: Into<String>>(&mut self, key: K, count: usize) {
        self.0.insert(key.into(), count as f64);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Missing keys read as zero.
    pub fn value(&self, key: &str) -> f64 {
        self.get(key).unwrap_or(0.0)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn merge(&mut self, other: Stats) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `part / whole * 100`, 0 when `whole` is not positive.
#[inline(always)]
pub fn pct(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Before/after cost comparison plus the per-row ABC distribution of both
/// layouts (`row_{r}_{class}_original` / `row_{r}_{class}_optimized`).
pub fn optimization_stats(original: &Grid, optimized: &Grid) -> Stats {
    let original_cost = total_cost(original);
    let optimized_cost = total_cost(optimized);

    let mut stats = Stats::new();
    stats.insert("original_cost", original_cost);
    stats.insert("optimized_cost", optimized_cost);
    stats.insert("cost_reduction", original_cost - optimized_cost);
    stats.insert(
        "improvement_percentage",
        pct(original_cost - optimized_cost, original_cost),
    );

    let before = original.classification_matrix();
    let after = optimized.classification_matrix();
    for (r, (row_before, row_after)) in before.iter().zip(&after).enumerate() {
        for class in Classification::iter() {
            let count_before = row_before.iter().filter(|&&c| c == class).count();
            let count_after = row_after.iter().filter(|&&c| c == class).count();
            stats.insert_count(format!("row_{}_{}_original", r, class), count_before);
            stats.insert_count(format!("row_{}_{}_optimized", r, class), count_after);
        }
    }

    stats
}
