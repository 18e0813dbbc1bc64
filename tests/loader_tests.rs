mod common;

use common::{grid_of, seeded_grid};
use slotforge::error::SlotForgeError;
use slotforge::loader::{load_grid_csv, read_grid, write_grid_csv};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_write_then_load() {
    let grid = seeded_grid(10, 10, 77);
    let file = NamedTempFile::new().unwrap();
    write_grid_csv(&grid, file.path()).unwrap();

    let loaded = load_grid_csv(file.path()).unwrap();
    assert_eq!(loaded.rows(), 10);
    assert_eq!(loaded.cols(), 10);
    assert_eq!(loaded.classification_matrix(), grid.classification_matrix());
    assert_eq!(loaded.score_matrix(), grid.score_matrix());
}

#[test]
fn test_cells_in_any_order() {
    let data = "row,col,class,score\n1,1,A,90\n0,0,C,25\n1,0,A,85\n0,1,B,60\n";
    let grid = read_grid(data.as_bytes()).unwrap();
    assert_eq!(grid.slots(), grid_of(&["C25 B60", "A85 A90"]).slots());
}

#[test]
fn test_duplicate_cell() {
    let data = "row,col,class,score\n0,0,A,90\n0,0,B,60\n";
    let err = read_grid(data.as_bytes()).unwrap_err();
    assert!(matches!(err, SlotForgeError::Shape(_) | SlotForgeError::Validation(_)));
}

#[test]
fn test_missing_cell() {
    let data = "row,col,class,score\n0,0,A,90\n0,1,B,60\n1,0,C,10\n";
    let err = read_grid(data.as_bytes()).unwrap_err();
    assert!(matches!(err, SlotForgeError::Shape(_)));
}

#[test]
fn test_bad_class() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "row,col,class,score").unwrap();
    writeln!(file, "0,0,Z,90").unwrap();
    let err = load_grid_csv(file.path()).unwrap_err();
    assert!(matches!(err, SlotForgeError::Csv(_)));
}

#[test]
fn test_empty_file() {
    let err = read_grid("row,col,class,score\n".as_bytes()).unwrap_err();
    assert!(matches!(err, SlotForgeError::Validation(_)));
}
