//! Blockweld (workspace facade crate).
//!
//! Re-exports the member crates under short names so tools and integration
//! tests can write `blockweld::core::Field` while the implementation lives in
//! dedicated crates under `crates/`.

pub mod cli;

pub use blockweld_core as core;
pub use blockweld_engine as engine;
pub use blockweld_input as input;
pub use blockweld_types as types;
