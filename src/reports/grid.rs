use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, CellAlignment, Color, Table};
use slotforge::core_types::Classification;
use slotforge::grid::Grid;
use slotforge::inertia::InertialMask;

/// Renders a layout row by row (row 0 on top, nearest the entrance).
/// Inertial positions, when a mask is given, are marked with `*`.
pub fn print_layout(name: &str, grid: &Grid, mask: Option<&InertialMask>) {
    println!("\nLayout: {}", name);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let mut header = vec![Cell::new("")];
    header.extend((0..grid.cols()).map(|c| Cell::new(c).set_alignment(CellAlignment::Center)));
    table.set_header(header);

    for (r, chunk) in grid.slots().chunks(grid.cols()).enumerate() {
        let mut cells = vec![Cell::new(format!("R{}", r))];
        cells.extend(chunk.iter().enumerate().map(|(c, slot)| {
            let pos = r * grid.cols() + c;
            let pinned = mask.map(|m| m.is_inertial(pos)).unwrap_or(false);
            let label = if pinned {
                format!("{}*", slot.label())
            } else {
                slot.label()
            };
            let color = match slot.class {
                Classification::A => Color::Green,
                Classification::B => Color::Yellow,
                Classification::C => Color::Red,
            };
            Cell::new(label)
                .fg(color)
                .set_alignment(CellAlignment::Center)
        }));
        table.add_row(cells);
    }
    println!("{}", table);
}
