//! Grid CSV files: header `row,col,class,score`, one record per cell.

use crate::core_types::{to_index, Classification};
use crate::error::{SfResult, SlotForgeError};
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct CellRecord {
    row: usize,
    col: usize,
    class: Classification,
    score: u32,
}

pub fn load_grid_csv<P: AsRef<Path>>(path: P) -> SfResult<Grid> {
    let path = path.as_ref();
    debug!("Loading grid from {}", path.display());
    let file = File::open(path).map_err(|e| {
        SlotForgeError::Validation(format!(
            "Could not open grid file '{}': {}",
            path.display(),
            e
        ))
    })?;
    read_grid(file)
}

/// Reads every cell exactly once. Dimensions are inferred from the largest
/// row and column indices.
pub fn read_grid<R: Read>(reader: R) -> SfResult<Grid> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut cells = Vec::new();
    for result in rdr.deserialize() {
        let rec: CellRecord = result?;
        cells.push(rec);
    }
    if cells.is_empty() {
        return Err(SlotForgeError::Validation(
            "Grid file contains no cells".to_string(),
        ));
    }

    let rows = cells.iter().map(|c| c.row).max().unwrap_or(0) + 1;
    let cols = cells.iter().map(|c| c.col).max().unwrap_or(0) + 1;
    let n = rows * cols;
    if cells.len() != n {
        return Err(SlotForgeError::Shape(format!(
            "A {}x{} grid needs {} cells, file has {}",
            rows,
            cols,
            n,
            cells.len()
        )));
    }

    let mut classes: Vec<Option<Classification>> = vec![None; n];
    let mut scores = vec![0u32; n];
    for cell in cells {
        let pos = to_index(cell.row, cell.col, cols);
        if classes[pos].is_some() {
            return Err(SlotForgeError::Validation(format!(
                "Cell ({}, {}) appears more than once",
                cell.row, cell.col
            )));
        }
        classes[pos] = Some(cell.class);
        scores[pos] = cell.score;
    }

    // Every position was filled: the count matched and none repeated.
    let classes = classes.into_iter().flatten().collect();
    Grid::new(rows, cols, classes, scores)
}

pub fn write_grid<W: Write>(grid: &Grid, writer: W) -> SfResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (pos, slot) in grid.slots().iter().enumerate() {
        let (row, col) = grid.coords(pos);
        wtr.serialize(CellRecord {
            row,
            col,
            class: slot.class,
            score: slot.score,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_grid_csv<P: AsRef<Path>>(grid: &Grid, path: P) -> SfResult<()> {
    let file = File::create(path.as_ref())?;
    write_grid(grid, file)
}
