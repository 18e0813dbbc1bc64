mod common;

use common::{assert_close, grid_of, labels, seeded_grid};
use rstest::rstest;
use slotforge::core_types::{Classification, ItemId};
use slotforge::cost::position_cost;
use slotforge::ledger::{
    apply_critical_movements, comparative_stats, compute_gains, select_critical_movements,
    swap_plan, MovementRecord,
};

fn record(id: u32, gain: f64) -> MovementRecord {
    MovementRecord {
        item: ItemId(id),
        class: Classification::A,
        score: 80,
        original_position: id as usize,
        optimized_position: 0,
        original_row: 1,
        optimized_row: 0,
        original_cost: 100.0,
        optimized_cost: 100.0 - gain,
        gain,
        gain_pct: gain,
    }
}

#[test]
fn test_gains_sorted_descending() {
    let original = grid_of(&["C25", "B60", "A85"]);
    let optimized = original.swapped(0, 2);
    let moves = compute_gains(&original, &optimized).unwrap();

    assert_eq!(moves.len(), 2);
    assert_eq!(moves[0].item, ItemId(2));
    assert_eq!(moves[0].original_row, 2);
    assert_eq!(moves[0].optimized_row, 0);
    assert_close(
        moves[0].gain,
        position_cost(2, 85.0) - position_cost(0, 85.0),
    );
    assert!(moves[1].gain < 0.0);
    assert_eq!(moves[1].class, Classification::C);
}

#[test]
fn test_unchanged_layout_has_no_movements() {
    let grid = seeded_grid(4, 4, 6);
    assert!(compute_gains(&grid, &grid).unwrap().is_empty());

    let (critical, stats) = select_critical_movements(&[], 50.0);
    assert!(critical.is_empty());
    assert_eq!(stats.total_movements, 0);
    assert_eq!(stats.total_gain, 0.0);
    assert_eq!(stats.critical_gain_percentage(), 0.0);
}

#[rstest]
#[case(50.0, 1)]
#[case(60.0, 2)]
#[case(80.0, 2)]
#[case(81.0, 3)]
#[case(100.0, 3)]
#[case(0.0, 0)]
fn test_pareto_prefix(#[case] target: f64, #[case] expected: usize) {
    let moves = vec![
        record(1, 50.0),
        record(2, 30.0),
        record(3, 20.0),
        record(4, -10.0),
    ];
    let (critical, stats) = select_critical_movements(&moves, target);

    assert_eq!(critical.len(), expected);
    assert_eq!(critical[..], moves[..expected]);
    assert_eq!(stats.total_movements, 4);
    assert_eq!(stats.total_gain, 100.0);
    assert_eq!(stats.net_gain, 90.0);
    assert_eq!(stats.target_percentage, target);
}

#[test]
fn test_pareto_stats_map() {
    let moves = vec![record(1, 60.0), record(2, 40.0)];
    let (_, stats) = select_critical_movements(&moves, 50.0);
    let map = stats.to_stats();

    assert_eq!(map.value("critical_movements"), 1.0);
    assert_eq!(map.value("critical_percentage"), 50.0);
    assert_eq!(map.value("critical_gain"), 60.0);
    assert_eq!(map.value("critical_gain_percentage"), 60.0);
}

#[test]
fn test_only_losses_select_nothing() {
    let moves = vec![record(1, -5.0), record(2, -10.0)];
    let (critical, stats) = select_critical_movements(&moves, 100.0);
    assert!(critical.is_empty());
    assert_eq!(stats.critical_movements, 0);
    assert_eq!(stats.total_gain, 0.0);
}

#[test]
fn test_swap_plan_replays_moves() {
    let original = grid_of(&["C25", "B60", "A85"]);
    let optimized = original.swapped(0, 2);
    let moves = compute_gains(&original, &optimized).unwrap();
    let (critical, _) = select_critical_movements(&moves, 100.0);
    assert_eq!(critical.len(), 1);

    let (layout, steps) = swap_plan(&original, &critical).unwrap();
    assert_eq!(labels(&layout), vec!["A85", "B60", "C25"]);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].step, 1);
    assert_eq!(steps[0].item, ItemId(2));
    assert_eq!((steps[0].from, steps[0].to), (2, 0));
    assert_eq!(steps[0].displaced, ItemId(0));

    let applied = apply_critical_movements(&original, &critical).unwrap();
    assert_eq!(applied.slots(), layout.slots());
}

#[test]
fn test_swap_plan_skips_settled_items() {
    let original = grid_of(&["C25 B60", "A85 A90"]);
    let optimized = original.swapped(0, 3).swapped(1, 2);
    let moves = compute_gains(&original, &optimized).unwrap();

    // replaying every move: later moves find their items already in place
    let (layout, steps) = swap_plan(&original, &moves).unwrap();
    assert_eq!(layout.slots(), optimized.slots());
    assert_eq!(steps.len(), 2);
}

#[test]
fn test_swap_plan_rejects_foreign_target() {
    let original = grid_of(&["C25", "A85"]);
    let mut bad = record(0, 10.0);
    bad.optimized_position = 7;
    assert!(swap_plan(&original, &[bad]).is_err());
}

#[test]
fn test_comparative_stats() {
    let original = grid_of(&["C25", "B60", "A85"]);
    let optimized = original.swapped(0, 2);
    let moves = compute_gains(&original, &optimized).unwrap();
    let (critical, pareto) = select_critical_movements(&moves, 100.0);
    let layout = apply_critical_movements(&original, &critical).unwrap();

    let stats = comparative_stats(&original, &optimized, &layout, &pareto);
    assert_close(stats.value("efficiency_ratio"), 100.0);
    assert_eq!(stats.value("total_possible_movements"), 2.0);
    assert_eq!(stats.value("critical_movements_count"), 1.0);
    assert_eq!(stats.value("movements_avoided"), 1.0);
    assert_close(stats.value("movements_avoided_pct"), 50.0);
    assert_close(
        stats.value("pareto_critical_gain"),
        stats.value("optimized_gain"),
    );
}
