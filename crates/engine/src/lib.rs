//! Game orchestration on top of `blockweld-core`
//!
//! [`GameLogic`] drives one level: it spawns pieces from a deterministic
//! sequence, applies player commands, lands pieces, hands the field to the
//! explosion and cascade engines and keeps a single-move undo.
//!
//! # Example
//!
//! ```
//! use blockweld_core::{LevelData, SimulationConfig};
//! use blockweld_engine::GameLogic;
//! use blockweld_types::{FrameResult, Objective, PieceKind};
//!
//! let level = LevelData {
//!     name: "doc".into(),
//!     columns: 4,
//!     rows: 6,
//!     visible_rows: None,
//!     lowest_visible_row: 0,
//!     grid: vec!["rr.r".into()],
//!     blueprint: Vec::new(),
//!     pieces: vec![PieceKind::Dot],
//!     opening: Vec::new(),
//!     objective: Objective::Clear,
//!     moves: 3,
//!     seed: 1,
//! };
//!
//! let mut logic = GameLogic::new(&level, SimulationConfig::default()).unwrap();
//! assert_eq!(logic.update(1.0 / 60.0), FrameResult::Running);
//! assert!(logic.falling().is_some());
//! ```

pub mod cascade;
pub mod falling;
pub mod game_logic;
pub mod history;
pub mod place;
pub mod sequence;
pub mod snapshot;

pub use cascade::{Cascade, CascadeState};
pub use falling::{FallingPiece, FallingState};
pub use game_logic::{GameLogic, LogicError, LogicState, SpawnError};
pub use history::{MoveData, MoveHistory};
pub use place::{validate_placement, DropPlacements, PlaceError, Placement, PlacementProvider};
pub use sequence::{PieceSequence, SimpleRng};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
