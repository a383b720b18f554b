//! Commands flowing into the simulation and events flowing out of it.

use crate::{BlockColor, DetonationKind, Fill, GridPos, PieceKind, Vec2};

/// Swipe gesture direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Player commands, drained one per frame by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InputCommand {
    /// Drag the falling piece towards a field position (cell units).
    DragTo { x: f32, y: f32 },
    /// Rotate, or detonate a bomb piece in place.
    Tap,
    /// Tap-to-place: pick the suggested placement under the point.
    TapAt { x: f32, y: f32 },
    /// Left/right switch with an upcoming piece, down drops.
    Swipe(SwipeDirection),
    Undo,
    Pause,
}

impl InputCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputCommand::DragTo { .. } => "drag_to",
            InputCommand::Tap => "tap",
            InputCommand::TapAt { .. } => "tap_at",
            InputCommand::Swipe(_) => "swipe",
            InputCommand::Undo => "undo",
            InputCommand::Pause => "pause",
        }
    }
}

/// Why a piece is being spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SpawnReason {
    LevelStart,
    NewMove,
    /// Swapped with an upcoming piece; keeps the outgoing position.
    Switch,
    UndoMove,
}

/// One cell removed by a row clear, for flying-block effects.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClearedCell {
    pub pos: GridPos,
    pub fill: Fill,
    pub color: BlockColor,
    pub gray: bool,
    /// Visual position at the moment of the clear.
    pub position: Vec2,
}

/// One-way notifications for effects, audio and HUD layers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GameEvent {
    PieceSpawned {
        piece_id: u32,
        kind: PieceKind,
        reason: SpawnReason,
    },
    PieceLanded {
        piece_id: u32,
        kind: PieceKind,
        cells: Vec<GridPos>,
    },
    RowsCleared {
        rows: Vec<i32>,
        cells: Vec<ClearedCell>,
    },
    RowsRemoved {
        rows: Vec<i32>,
    },
    BombDetonated {
        kind: DetonationKind,
        pos: GridPos,
    },
    CellsDestroyed {
        cells: Vec<GridPos>,
    },
    /// Gray structures that landed after a row removal.
    BlocksBounced {
        cells: Vec<GridPos>,
    },
    /// Another row became full during a cascade (`level` starts at 1).
    Cascade {
        level: u32,
    },
    MoveUndone {
        move_id: u32,
    },
    ObjectiveProgress {
        done: u32,
        total: u32,
    },
}

/// Result of one simulation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FrameResult {
    Running,
    GameOver,
    LevelCompleted,
    OutOfMoves,
}

impl FrameResult {
    pub fn is_finished(self) -> bool {
        self != FrameResult::Running
    }
}
