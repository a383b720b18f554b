//! Field tests - grid layout, row clearing and the visible window

use blockweld::core::{Field, FieldSnapshot, SubCell};
use blockweld::types::{BlockColor, Fill, GridPos};

#[test]
fn test_field_new_empty() {
    let field = Field::new(6, 10, 8);
    assert_eq!(field.columns(), 6);
    assert_eq!(field.rows(), 10);
    assert_eq!(field.visible_rows(), 8);
    assert_eq!(field.occupied_cell_count(), 0);
    assert!(field.full_rows().is_empty());
    for row in 0..10 {
        for col in 0..6 {
            assert!(field.cell(GridPos::new(col, row)).is_some_and(|c| c.is_empty()));
        }
    }
}

#[test]
fn test_out_of_bounds_cells() {
    let field = Field::new(4, 4, 4);
    assert!(field.cell(GridPos::new(-1, 0)).is_none());
    assert!(field.cell(GridPos::new(0, -1)).is_none());
    assert!(field.cell(GridPos::new(4, 0)).is_none());
    assert!(field.cell(GridPos::new(0, 4)).is_none());
}

#[test]
fn test_clear_then_remove_shifts_rows_down() {
    let mut field = Field::from_ascii(&[
        ".b..",
        "gg.y",
        "rrrr",
        "o..o",
    ])
    .unwrap();
    let before = field.occupied_cell_count();

    assert_eq!(field.full_rows(), vec![1]);
    let cells = field.clear_rows(&[1]);
    assert_eq!(cells.len(), 4);
    assert!(cells.iter().all(|c| c.color == BlockColor::Red && c.pos.row == 1));
    assert_eq!(field.to_ascii()[2], "----");

    assert_eq!(field.remove_cleared_rows(), vec![1]);
    assert_eq!(field.occupied_cell_count(), before - 4);
    assert_eq!(field.to_ascii(), vec!["....", ".b..", "gg.y", "o..o"]);
}

#[test]
fn test_clear_multiple_rows_at_once() {
    let mut field = Field::from_ascii(&["r...", "gggg", "b...", "yyyy"]).unwrap();
    let rows = field.full_rows();
    assert_eq!(rows, vec![0, 2]);
    field.clear_rows(&rows);
    assert_eq!(field.remove_cleared_rows(), vec![0, 2]);
    assert_eq!(field.to_ascii(), vec!["....", "....", "r...", "b..."]);
}

#[test]
fn test_complementary_halves_fill_a_cell() {
    let mut field = Field::new(3, 3, 3);
    let pos = GridPos::new(1, 0);
    assert!(field.place(pos, SubCell::block(Fill::LowerLeft, BlockColor::Green, 1)));
    assert!(!field.cell(pos).unwrap().is_full());
    assert!(field.place(pos, SubCell::block(Fill::UpperRight, BlockColor::Blue, 2)));
    assert!(field.cell(pos).unwrap().is_full());
    assert!(!field.place(pos, SubCell::block(Fill::LowerLeft, BlockColor::Red, 3)));
}

#[test]
fn test_window_excludes_rows_below() {
    let mut field = Field::from_ascii(&["....", "....", "rrrr", "gggg"]).unwrap();
    let mut windowed = Field::new(4, 4, 3);
    for (row, line) in [(0, "gggg"), (1, "rrrr")] {
        for (col, ch) in line.chars().enumerate() {
            let color = BlockColor::from_char(ch).unwrap();
            windowed.place(GridPos::new(col as i32, row), SubCell::block(Fill::Full, color, 0));
        }
    }
    windowed.set_lowest_visible_row(1);
    assert_eq!(windowed.full_rows(), vec![1]);
    assert!(!windowed.is_in_window(0));

    assert_eq!(field.full_rows(), vec![0, 1]);
    field.set_lowest_visible_row(1);
    // visible rows equal the field height, so the window cannot move
    assert_eq!(field.lowest_visible_row(), 0);
}

#[test]
fn test_field_snapshot_json() {
    let mut field = Field::from_ascii(&["r.", "rg"]).unwrap();
    field.manage_welds();
    let snap = FieldSnapshot::from(&field);
    assert_eq!(snap.occupied, 3);
    assert_eq!(snap.welded_sub_cells, 2);
    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.contains("\"grid\":[\"r.\",\"rg\"]"));
}
