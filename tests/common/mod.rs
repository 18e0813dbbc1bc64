#![allow(dead_code)]

use slotforge::config::Config;
use slotforge::core_types::Classification;
use slotforge::generator::random_grid;
use slotforge::grid::Grid;
use std::str::FromStr;

/// Grid from row strings of cell labels, e.g. `["C25 B60", "A85 A90"]`.
pub fn grid_of(rows: &[&str]) -> Grid {
    let mut classes = Vec::new();
    let mut scores = Vec::new();
    let mut cols = 0;
    for row in rows {
        let cells: Vec<&str> = row.split_whitespace().collect();
        cols = cells.len();
        for cell in cells {
            let (class, score) = cell.split_at(1);
            classes.push(Classification::from_str(class).unwrap());
            scores.push(score.parse().unwrap());
        }
    }
    Grid::new(rows.len(), cols, classes, scores).unwrap()
}

pub fn seeded_grid(rows: usize, cols: usize, seed: u64) -> Grid {
    random_grid(rows, cols, &mut fastrand::Rng::with_seed(seed)).unwrap()
}

/// Labels in row-major order, e.g. `["C25", "A85"]`.
pub fn labels(grid: &Grid) -> Vec<String> {
    grid.slots().iter().map(|s| s.label()).collect()
}

pub fn assert_permutation(a: &Grid, b: &Grid) {
    assert!(a.same_shape(b), "shape changed");
    assert_eq!(a.content_fingerprint(), b.content_fingerprint());
    for slot in a.slots() {
        assert!(b.position_of(slot.id).is_some(), "{:?} lost", slot.id);
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// Defaults, with a penalty large enough to pin inertial items on any grid
/// used by the tests.
pub fn strict_config() -> Config {
    let mut cfg = Config::default();
    cfg.weights.inertia_penalty = 1e6;
    cfg
}
