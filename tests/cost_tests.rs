mod common;

use common::{assert_close, grid_of, seeded_grid};
use rstest::rstest;
use slotforge::affinity::AffinityMatrix;
use slotforge::cost::{
    build_cost_matrix, element_costs, euclidean_distance, importance_factor, position_cost,
    row_distance, total_cost, CostMatrix,
};
use slotforge::core_types::Classification;
use slotforge::error::SlotForgeError;
use slotforge::grid::Grid;

#[rstest]
#[case(0, 1.0)]
#[case(1, 2.0)]
#[case(5, 6.0)]
#[case(9, 10.0)]
fn test_row_distance(#[case] row: usize, #[case] expected: f64) {
    assert_eq!(row_distance(row), expected);
}

#[test]
fn test_position_cost_formula() {
    // distance 6 (row 5), importance 85
    let expected = 6.0 * 85.0 * (86f64.log10() + 1.0);
    assert_close(position_cost(5, 85.0), expected);
    assert!((position_cost(5, 85.0) - 1496.59).abs() < 0.01);
}

#[test]
fn test_importance_factor_floor() {
    assert_close(importance_factor(0.0), 1.0);
    assert!(importance_factor(1.0) > 1.0);
}

#[rstest]
#[case(1.0)]
#[case(25.0)]
#[case(100.0)]
fn test_cost_increases_with_depth(#[case] score: f64) {
    for row in 0..9 {
        assert!(
            position_cost(row + 1, score) > position_cost(row, score),
            "row {} -> {} for score {}",
            row,
            row + 1,
            score
        );
    }
}

#[rstest]
#[case(0)]
#[case(4)]
#[case(9)]
fn test_cost_increases_with_importance(#[case] row: usize) {
    for score in 1..100 {
        let s = score as f64;
        assert!(position_cost(row, s + 1.0) > position_cost(row, s));
    }
}

#[rstest]
#[case(0, 0, 0.0)]
#[case(0, 1, 1.0)]
#[case(0, 10, 1.0)]
#[case(0, 11, std::f64::consts::SQRT_2)]
#[case(3, 43, 4.0)]
fn test_euclidean_distance(#[case] a: usize, #[case] b: usize, #[case] expected: f64) {
    assert_close(euclidean_distance(a, b, 10), expected);
}

#[test]
fn test_total_cost_sums_cells() {
    let grid = grid_of(&["C25 B60", "A85 A90"]);
    let expected = position_cost(0, 25.0)
        + position_cost(0, 60.0)
        + position_cost(1, 85.0)
        + position_cost(1, 90.0);
    assert_close(total_cost(&grid), expected);
    assert_close(element_costs(&grid).iter().sum(), expected);
}

#[test]
fn test_total_cost_full_grid() {
    let classes = (0..100)
        .map(|i| match i / 34 {
            0 => Classification::A,
            1 => Classification::B,
            _ => Classification::C,
        })
        .collect();
    let scores: Vec<u32> = (0..100).map(|i| 1 + i as u32).collect();
    let grid = Grid::new(10, 10, classes, scores).unwrap();

    let mut expected = 0.0;
    for row in 0..10 {
        let distance = if row == 0 { 1.0 } else { (row + 1) as f64 };
        for col in 0..10 {
            let score = (1 + row * 10 + col) as f64;
            expected += distance * score * ((score + 1.0).log10() + 1.0);
        }
    }
    assert!((total_cost(&grid) - expected).abs() < 1e-6);
}

#[test]
fn test_matrix_without_affinity_is_base_cost() {
    let grid = seeded_grid(4, 5, 3);
    let m = build_cost_matrix(&grid, None, 0.0).unwrap();
    assert_eq!(m.size(), 20);
    for i in 0..20 {
        let score = grid.slot(i).score as f64;
        for j in 0..20 {
            assert_close(m.get(i, j), position_cost(j / 5, score));
        }
    }
}

#[test]
fn test_zero_weight_ignores_affinity() {
    let grid = seeded_grid(3, 3, 11);
    let aff = AffinityMatrix::from_groups(9, &[vec![0, 8]], 0.9).unwrap();
    let plain = build_cost_matrix(&grid, None, 0.0).unwrap();
    let weighted = build_cost_matrix(&grid, Some(&aff), 0.0).unwrap();
    assert_eq!(plain, weighted);
}

#[test]
fn test_affinity_term_only_touches_paired_items() {
    let grid = seeded_grid(3, 3, 5);
    let aff = AffinityMatrix::from_groups(9, &[vec![1, 7]], 0.5).unwrap();
    let weight = 2.0;
    let base = build_cost_matrix(&grid, None, 0.0).unwrap();
    let m = build_cost_matrix(&grid, Some(&aff), weight).unwrap();

    for i in 0..9 {
        for j in 0..9 {
            let extra = m.get(i, j) - base.get(i, j);
            if i == 1 || i == 7 {
                // a * w / 2 * sum_q d(j, q)
                let mass: f64 = (0..9).map(|q| euclidean_distance(j, q, 3)).sum();
                assert_close(extra, 0.5 * weight / 2.0 * mass);
            } else {
                assert_close(extra, 0.0);
            }
        }
    }
}

#[test]
fn test_affinity_size_mismatch_is_rejected() {
    let grid = seeded_grid(3, 3, 1);
    let aff = AffinityMatrix::empty(4);
    let err = build_cost_matrix(&grid, Some(&aff), 1.0).unwrap_err();
    assert!(matches!(err, SlotForgeError::Shape(_)));
}

#[test]
fn test_cost_matrix_rejects_bad_rows() {
    assert!(CostMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    assert!(CostMatrix::from_rows(vec![vec![1.0, f64::NAN], vec![3.0, 4.0]]).is_err());
    let ok = CostMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    assert_eq!(ok.get(1, 0), 3.0);
}
