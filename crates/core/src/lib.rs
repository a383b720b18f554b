//! Field simulation core - pure, deterministic, and testable
//!
//! This crate holds the field model and every engine that mutates it. It has
//! no dependencies on rendering, input or I/O and never advances game state by
//! itself; the orchestrator in `blockweld-engine` decides when each engine runs.
//!
//! # Module Structure
//!
//! - [`grid`]: dual-sub-cell field, row clearing/removal, undo snapshot
//! - [`collision`]: intersection tables and collision/free-space scans
//! - [`pieces`]: piece shape tables and the [`PieceBlocks`] shape view
//! - [`weld`]: weld formation, redundancy retirement, triangle merging
//! - [`gravity`]: cluster flood fill and drop, floating gray structures
//! - [`explosions`]: timed area blasts and row lasers with chaining
//! - [`level`]: level data, validation and objective progress
//! - [`config`]: simulation tuning with serde defaults
//! - [`snapshot`]: serializable field view
//!
//! # Example
//!
//! ```
//! use blockweld_core::{Field, PieceCatalog};
//! use blockweld_core::types::{GridPos, PieceKind, Rotation};
//!
//! let mut field = Field::from_ascii(&[
//!     "....",
//!     "....",
//!     "r..r",
//! ]).unwrap();
//!
//! let catalog = PieceCatalog::standard();
//! let dot = catalog.get(catalog.find(PieceKind::Dot).unwrap()).unwrap();
//! let shape = dot.blocks(Rotation::North);
//!
//! // A single block dropped in column 1 rests on the floor.
//! assert_eq!(field.detect_collision_down(&shape, GridPos::new(1, 2)), Some(0));
//!
//! field.manage_welds();
//! let report = field.apply_gravity();
//! assert!(!report.moved());
//! ```

pub mod collision;
pub mod config;
pub mod explosions;
pub mod gravity;
pub mod grid;
pub mod level;
pub mod pieces;
pub mod snapshot;
pub mod weld;

pub use blockweld_types as types;

// Re-export commonly used types for convenience
pub use collision::{sub_cells_intersect, Collision};
pub use config::{ConfigError, SimulationConfig};
pub use explosions::{Detonation, FieldExplosions, LaserCursor, LaserPhase};
pub use gravity::{GravityReport, VisitMarks};
pub use grid::{Cell, Field, PieceId, SubCell, SubCellRef, WeldLink, WeldSet};
pub use level::{LevelData, LevelError, ObjectiveProgress};
pub use pieces::{Extent, PieceBlocks, PieceCatalog, PieceType, PieceTypeId};
pub use snapshot::FieldSnapshot;
pub use weld::weld_compatible;
