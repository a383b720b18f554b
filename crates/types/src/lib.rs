//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are plain data with no required dependencies, so they can be used
//! from the simulation core, the orchestrator, input front-ends and tools
//! alike. Enable the `serde` feature for (de)serialization derives.
//!
//! # Field coordinates
//!
//! - Column 0 is the left wall, row 0 is the **bottom** row.
//! - Every cell holds two sub-cell slots so two complementary triangles can
//!   share it (see [`Fill`]).
//! - Only the window `lowest_visible_row .. lowest_visible_row + visible_rows`
//!   is playable; rows below it always count as collision.
//!
//! # Timing constants
//!
//! Timing values are in seconds, speeds in cells per second:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FALL_SPEED` | 1.5 | Passive fall speed of the active piece |
//! | `DRAG_FALL_SPEED` | 30.0 | Fastest a dragged piece follows the finger down |
//! | `LANDING_TIMEOUT_SECS` | 0.5 | Rest time before a resting piece lands |
//! | `CLEAR_LINE_DEBOUNCE_SECS` | 0.15 | Wait before a cascade clears the next row |
//! | `EXPLOSION_SPEED` | 10.0 | Ring growth of area detonations |
//! | `LASER_FREE_SPEED` | 40.0 | Row laser over empty cells |
//! | `LASER_CUT_INTERVAL_SECS` | 0.06 | Row laser time per cut cell |
//!
//! # Examples
//!
//! ```
//! use blockweld_types::{Direction, Fill, GridPos, PieceKind, Rotation};
//!
//! let pos = GridPos::new(3, 5).step(Direction::S);
//! assert_eq!(pos, GridPos::new(3, 4));
//!
//! assert!(Fill::LowerLeft.is_complementary(Fill::UpperRight));
//! assert_eq!(Fill::LowerLeft.rotate_cw(), Fill::UpperLeft);
//!
//! assert_eq!(PieceKind::from_str("ramp"), Some(PieceKind::Ramp));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! ```

pub mod block;
pub mod event;
pub mod fill;
pub mod geometry;

pub use block::{BlockColor, BlockKind, DetonationKind, Objective, PieceKind, Rotation};
pub use event::{
    ClearedCell, FrameResult, GameEvent, InputCommand, SpawnReason, SwipeDirection,
};
pub use fill::{Fill, Intersection, ScanDirection};
pub use geometry::{Direction, GridPos, Vec2};

/// Upper bound on field rows; also caps every scan loop.
pub const MAX_NUM_ROWS: usize = 128;

/// Upper bound on field columns.
pub const MAX_NUM_COLUMNS: usize = 32;

/// Largest piece grid (pieces live in at most 4x4 cells).
pub const PIECE_GRID_MAX: usize = 4;

/// Click grids are this many times finer than the fill grid.
pub const CLICK_GRID_SCALE: usize = 2;

/// Number of upcoming pieces the player can switch to.
pub const UPCOMING_PIECES: usize = 2;

/// Furthest a rotation may shift a piece to get clear of a collision.
pub const MAX_ROTATE_ADJUSTMENT: i32 = 2;

/// Passive fall speed of the active piece (rows per second).
pub const FALL_SPEED: f32 = 1.5;

/// Fastest a dragged piece moves down (rows per second).
pub const DRAG_FALL_SPEED: f32 = 30.0;

/// Time a piece may rest on its ghost row before it lands.
pub const LANDING_TIMEOUT_SECS: f32 = 0.5;

/// Debounce between a cascade finding a full row and clearing it.
pub const CLEAR_LINE_DEBOUNCE_SECS: f32 = 0.15;

/// Ring growth of area detonations (cells per second).
pub const EXPLOSION_SPEED: f32 = 10.0;

/// Row laser speed over empty cells (cells per second).
pub const LASER_FREE_SPEED: f32 = 40.0;

/// Row laser time spent cutting one occupied cell.
pub const LASER_CUT_INTERVAL_SECS: f32 = 0.06;

/// Reach of a point bomb ring.
pub const POINT_BOMB_REACH: i32 = 2;

/// Reach of a big (2x2) bomb ring.
pub const BIG_BOMB_REACH: i32 = 2;

/// Reach of a level bomb ring.
pub const LEVEL_BOMB_REACH: i32 = 1;

/// Weld appear/disappear animation speed (phase units per second).
pub const WELD_ANIM_SPEED: f32 = 6.0;

/// Visual catch-up speed of blocks moved by gravity (cells per second).
pub const BLOCK_FALL_ANIM_SPEED: f32 = 14.0;

/// Piece id of blocks authored by the level.
pub const LEVEL_OWNER: u32 = 0;
