//! Tap-to-place: suggested resting positions and their validation.

use serde::Serialize;
use thiserror::Error;

use blockweld_core::{Field, PieceType};
use blockweld_types::{GridPos, Rotation};

/// A resting position the active piece can be put into with one tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub rotation: Rotation,
    pub col: i32,
    pub row: i32,
}

impl Placement {
    pub fn origin(&self) -> GridPos {
        GridPos::new(self.col, self.row)
    }
}

/// Source of placement suggestions for the active piece.
pub trait PlacementProvider {
    fn placements(&self, field: &Field, piece: &PieceType) -> Vec<Placement>;
}

/// Every column and rotation, dropped straight down from the spawn height.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropPlacements;

impl PlacementProvider for DropPlacements {
    fn placements(&self, field: &Field, piece: &PieceType) -> Vec<Placement> {
        let rotations: &[Rotation] = if piece.can_rotate {
            &Rotation::ALL
        } else {
            &[Rotation::North]
        };
        let top = field.top_visible_row() as i32;
        let mut out = Vec::new();

        for &rotation in rotations {
            let shape = piece.blocks(rotation);
            let Some(ext) = shape.extent() else { continue };
            let start_row = top - 1 - ext.max_row;
            for col in -ext.min_col..field.columns() as i32 - ext.max_col {
                let start = GridPos::new(col, start_row);
                if field.collides(&shape, start) {
                    continue;
                }
                if let Some(row) = field.detect_collision_down(&shape, start) {
                    out.push(Placement { rotation, col, row });
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("piece cannot take the target rotation")]
    RotationBlocked,
    #[error("target would place piece out of bounds")]
    OutOfBounds,
    #[error("target overlaps blocks in the field")]
    Blocked,
    #[error("piece would not rest at the target row")]
    NotResting,
    #[error("game is not playable")]
    NotPlayable,
    #[error("no active piece")]
    NoActive,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::NotPlayable | PlaceError::NoActive => "not_playable",
            PlaceError::RotationBlocked
            | PlaceError::OutOfBounds
            | PlaceError::Blocked
            | PlaceError::NotResting => "invalid_place",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::RotationBlocked => "piece cannot take the target rotation",
            PlaceError::OutOfBounds => "target would place piece out of bounds",
            PlaceError::Blocked => "target overlaps blocks in the field",
            PlaceError::NotResting => "piece would not rest at the target row",
            PlaceError::NotPlayable => "game is not playable",
            PlaceError::NoActive => "no active piece",
        }
    }
}

/// Check that `placement` is a legal resting position for `piece`.
pub fn validate_placement(
    field: &Field,
    piece: &PieceType,
    placement: &Placement,
) -> Result<(), PlaceError> {
    if !piece.can_rotate && placement.rotation != Rotation::North {
        return Err(PlaceError::RotationBlocked);
    }
    let shape = piece.blocks(placement.rotation);
    let Some(ext) = shape.extent() else {
        return Err(PlaceError::OutOfBounds);
    };
    let origin = placement.origin();
    if origin.col + ext.min_col < 0
        || origin.col + ext.max_col >= field.columns() as i32
        || !field.is_in_window(origin.row + ext.min_row)
        || !field.is_in_window(origin.row + ext.max_row)
    {
        return Err(PlaceError::OutOfBounds);
    }
    if field.collides(&shape, origin) {
        return Err(PlaceError::Blocked);
    }
    if field.detect_collision_down(&shape, origin) != Some(origin.row) {
        return Err(PlaceError::NotResting);
    }
    Ok(())
}
