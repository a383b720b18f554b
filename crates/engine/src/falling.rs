//! The active falling piece.

use serde::Serialize;

use blockweld_core::{PieceId, PieceTypeId};
use blockweld_types::{GridPos, PieceKind, Rotation, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallingState {
    Falling,
    /// Following a drag downwards faster than the passive fall.
    BeingDraggedDown,
    /// Resting on the ghost row; lands when the landing timer runs out.
    Landing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallingPiece {
    pub id: PieceId,
    pub piece_type: PieceTypeId,
    pub kind: PieceKind,
    pub rotation: Rotation,
    /// Continuous origin; `x` is always a whole column.
    pub position: Vec2,
    /// Row the piece would land on if dropped now.
    pub ghost_row: i32,
    pub state: FallingState,
    pub landing_timer: f32,
    pub drag_target: Option<f32>,
}

impl FallingPiece {
    pub fn new(
        id: PieceId,
        piece_type: PieceTypeId,
        kind: PieceKind,
        origin: GridPos,
        ghost_row: i32,
    ) -> Self {
        let mut piece = Self {
            id,
            piece_type,
            kind,
            rotation: Rotation::North,
            position: origin.to_vec2(),
            ghost_row,
            state: FallingState::Falling,
            landing_timer: 0.0,
            drag_target: None,
        };
        piece.refresh_state();
        piece
    }

    pub fn col(&self) -> i32 {
        self.position.x.round() as i32
    }

    /// Row used for collision checks; a piece between rows counts as the upper one.
    pub fn row(&self) -> i32 {
        self.position.y.ceil() as i32
    }

    pub fn floor_row(&self) -> i32 {
        self.position.y.floor() as i32
    }

    pub fn origin(&self) -> GridPos {
        GridPos::new(self.col(), self.row())
    }

    pub fn is_resting(&self) -> bool {
        self.position.y <= self.ghost_row as f32
    }

    /// Switch between falling and landing after the ghost row moved.
    pub fn refresh_state(&mut self) {
        if self.is_resting() {
            self.position.y = self.ghost_row as f32;
            self.drag_target = None;
            if self.state != FallingState::Landing {
                self.state = FallingState::Landing;
                self.landing_timer = 0.0;
            }
        } else if self.state == FallingState::Landing {
            self.state = FallingState::Falling;
        }
    }

    /// Move down by `dt` at the speed of the current state.
    pub fn advance(&mut self, dt: f32, fall_speed: f32, drag_speed: f32) {
        match self.state {
            FallingState::Falling => {
                self.position.y -= fall_speed * dt;
            }
            FallingState::BeingDraggedDown => {
                let target = self.drag_target.unwrap_or(self.ghost_row as f32);
                self.position.y = (self.position.y - drag_speed * dt).max(target);
                if self.position.y <= target {
                    self.drag_target = None;
                    self.state = FallingState::Falling;
                }
            }
            FallingState::Landing => {
                self.landing_timer += dt;
                return;
            }
        }
        self.refresh_state();
    }
}
