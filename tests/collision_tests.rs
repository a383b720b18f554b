//! Collision tests - scans, wall kicks and impacted bombs

use blockweld::core::{Field, PieceCatalog, PieceType};
use blockweld::types::{GridPos, PieceKind, Rotation, MAX_ROTATE_ADJUSTMENT};

fn piece(kind: PieceKind) -> PieceType {
    let catalog = PieceCatalog::standard();
    catalog.get(catalog.find(kind).unwrap()).cloned().unwrap()
}

fn empty(columns: usize, rows: usize) -> Field {
    Field::new(columns, rows, rows)
}

#[test]
fn test_drop_rows_are_collision_free() {
    let field = Field::from_ascii(&[
        "......",
        "......",
        "......",
        "..r...",
        ".rr..g",
        "rrr.gg",
    ])
    .unwrap();
    let t = piece(PieceKind::T);
    for rotation in Rotation::ALL {
        let shape = t.blocks(rotation);
        let ext = shape.extent().unwrap();
        for col in -ext.min_col..6 - ext.max_col {
            let start = GridPos::new(col, 5 - ext.max_row);
            let Some(row) = field.detect_collision_down(&shape, start) else {
                continue;
            };
            assert!(!field.collides(&shape, GridPos::new(col, row)));
            assert!(field.collides(&shape, GridPos::new(col, row - 1)));
        }
    }
}

#[test]
fn test_wall_kick_shifts_off_left_wall() {
    let field = empty(6, 8);
    let j = piece(PieceKind::J);
    let origin = GridPos::new(-1, 3);
    assert!(!field.collides(&j.blocks(Rotation::East), origin));

    let south = j.blocks(Rotation::South);
    assert!(field.collides(&south, origin));
    let kicked = field.resolve_rotation(&south, origin, MAX_ROTATE_ADJUSTMENT);
    assert_eq!(kicked, Some(GridPos::new(0, 3)));
}

#[test]
fn test_rotation_without_collision_keeps_origin() {
    let field = empty(6, 8);
    let t = piece(PieceKind::T);
    let origin = GridPos::new(2, 3);
    let east = t.blocks(Rotation::East);
    assert_eq!(field.resolve_rotation(&east, origin, MAX_ROTATE_ADJUSTMENT), Some(origin));
}

#[test]
fn test_wall_kick_rejected_beyond_max_adjustment() {
    let field = Field::from_ascii(&[
        "......",
        "......",
        "......",
        "..r...",
        "......",
        "......",
        "......",
        "......",
    ])
    .unwrap();
    let i = piece(PieceKind::I);
    let origin = GridPos::new(-2, 3);
    assert!(!field.collides(&i.blocks(Rotation::East), origin));

    let south = i.blocks(Rotation::South);
    assert_eq!(field.resolve_rotation(&south, origin, MAX_ROTATE_ADJUSTMENT), None);

    let open = empty(6, 8);
    assert_eq!(
        open.resolve_rotation(&south, origin, MAX_ROTATE_ADJUSTMENT),
        Some(GridPos::new(0, 3))
    );
}

#[test]
fn test_wedge_drops_to_floor() {
    let field = Field::from_ascii(&["...", "...", "..."]).unwrap();
    let wedge = piece(PieceKind::Wedge);
    let shape = wedge.blocks(Rotation::North);
    assert_eq!(field.detect_collision_down(&shape, GridPos::new(1, 2)), Some(0));
}

#[test]
fn test_sideways_limits() {
    let field = Field::from_ascii(&["......", "r....g"]).unwrap();
    let dot = piece(PieceKind::Dot);
    let shape = dot.blocks(Rotation::North);
    assert_eq!(field.detect_collision_left(&shape, GridPos::new(3, 0)), Some(0));
    assert_eq!(field.detect_collision_right(&shape, GridPos::new(3, 0)), Some(5));
    assert_eq!(field.detect_collision_left(&shape, GridPos::new(3, 1)), Some(-1));
    assert_eq!(field.detect_collision_right(&shape, GridPos::new(3, 1)), Some(6));
}

#[test]
fn test_free_space_search() {
    let field = Field::from_ascii(&["...", "r..", "r.."]).unwrap();
    let dot = piece(PieceKind::Dot);
    let shape = dot.blocks(Rotation::North);
    assert_eq!(
        field.detect_free_space_right(&shape, GridPos::new(0, 0), 2),
        Some(GridPos::new(1, 0))
    );
    assert_eq!(
        field.detect_free_space_up(&shape, GridPos::new(0, 0), 2),
        Some(GridPos::new(0, 2))
    );
    assert_eq!(field.detect_free_space_up(&shape, GridPos::new(0, 0), 1), None);
}

#[test]
fn test_impacted_bombs_found_under_landing_piece() {
    let field = Field::from_ascii(&["....", "....", ".*.L", "rrrr"]).unwrap();
    let i = piece(PieceKind::I);
    let shape = i.blocks(Rotation::North);
    let landing = field.detect_collision_down(&shape, GridPos::new(0, 1)).unwrap();
    assert_eq!(landing, 0);
    let mut bombs = field.detect_impacted_bombs(&shape, GridPos::new(0, landing));
    bombs.sort();
    assert_eq!(bombs, vec![GridPos::new(1, 1), GridPos::new(3, 1)]);
}
