use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use slotforge::grid::Grid;
use slotforge::ledger::{MovementRecord, SwapStep};
use slotforge::pipeline::StrategyOutcome;
use slotforge::stats::Stats;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn right_align(table: &mut Table, columns: std::ops::RangeInclusive<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

/// Summary keys first, per-row distribution counts left out (the grids show
/// them already).
pub fn stats(title: &str, stats: &Stats) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new(title).add_attribute(Attribute::Bold),
        Cell::new("Value"),
    ]);

    for (key, value) in stats.iter().filter(|(k, _)| !k.starts_with("row_")) {
        let text = if value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{:.0}", value)
        } else {
            format!("{:.2}", value)
        };
        table.add_row(vec![Cell::new(key), Cell::new(text)]);
    }
    right_align(&mut table, 1..=1);
    println!("\n{}", table);
}

pub fn movements(movements: &[MovementRecord]) {
    if movements.is_empty() {
        println!("\nNo movements.");
        return;
    }

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Item"),
        Cell::new("From"),
        Cell::new("To"),
        Cell::new("Cost Before"),
        Cell::new("Cost After"),
        Cell::new("Gain").fg(Color::Green),
        Cell::new("Gain %"),
    ]);

    for (i, m) in movements.iter().enumerate() {
        let gain_cell = if m.gain >= 0.0 {
            Cell::new(format!("{:.1}", m.gain)).fg(Color::Green)
        } else {
            Cell::new(format!("{:.1}", m.gain)).fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{}{}", m.class, m.score)).add_attribute(Attribute::Bold),
            Cell::new(format!("R{} ({})", m.original_row, m.original_position)),
            Cell::new(format!("R{} ({})", m.optimized_row, m.optimized_position)),
            Cell::new(format!("{:.1}", m.original_cost)),
            Cell::new(format!("{:.1}", m.optimized_cost)),
            gain_cell,
            Cell::new(format!("{:.1}%", m.gain_pct)),
        ]);
    }
    right_align(&mut table, 4..=7);
    println!("\n{}", table);
}

pub fn swap_steps(steps: &[SwapStep]) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Step").add_attribute(Attribute::Bold),
        Cell::new("Item"),
        Cell::new("From"),
        Cell::new("To"),
        Cell::new("Displaced"),
        Cell::new("Gain"),
    ]);
    for s in steps {
        table.add_row(vec![
            Cell::new(s.step),
            Cell::new(s.item.0),
            Cell::new(s.from),
            Cell::new(s.to),
            Cell::new(s.displaced.0),
            Cell::new(format!("{:.1}", s.gain)),
        ]);
    }
    right_align(&mut table, 5..=5);
    println!("\n{}", table);
}

/// Cost of the layout a strategy actually hands back. Pareto-critical keeps
/// the full inertia layout under `optimized_cost` for reference.
fn final_cost(o: &StrategyOutcome) -> f64 {
    o.stats
        .get("pareto_critical_cost")
        .unwrap_or_else(|| o.stats.value("optimized_cost"))
}

/// One row per strategy, best final cost highlighted.
pub fn comparison(original: &Grid, outcomes: &[StrategyOutcome]) {
    let Some(best) = outcomes
        .iter()
        .min_by(|a, b| final_cost(a).total_cmp(&final_cost(b)))
        .map(|o| o.strategy)
    else {
        return;
    };

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Strategy").add_attribute(Attribute::Bold),
        Cell::new("Original"),
        Cell::new("Final").fg(Color::Cyan),
        Cell::new("Reduction"),
        Cell::new("Improv %"),
        Cell::new("Moved"),
        Cell::new("Inertial"),
    ]);

    for o in outcomes {
        let original_cost = o.stats.value("original_cost");
        let final_cost = final_cost(o);
        let reduction = original_cost - final_cost;
        let improvement = if original_cost > 0.0 {
            reduction / original_cost * 100.0
        } else {
            0.0
        };

        let name_cell = if o.strategy == best {
            Cell::new(o.strategy)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(o.strategy).add_attribute(Attribute::Bold)
        };
        let inertial = o
            .inertial_mask
            .as_ref()
            .map(|m| m.count().to_string())
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            name_cell,
            Cell::new(format!("{:.0}", original_cost)),
            Cell::new(format!("{:.0}", final_cost)).fg(Color::Cyan),
            Cell::new(format!("{:.0}", reduction)),
            Cell::new(format!("{:.1}%", improvement)),
            Cell::new(original.displaced_count(&o.grid)),
            Cell::new(inertial),
        ]);
    }
    right_align(&mut table, 1..=6);
    println!("\n{}", table);
}
