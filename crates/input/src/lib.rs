//! Touch input module (engine-facing).
//!
//! This crate is independent of any windowing or touch framework. Front-ends
//! feed raw [`TouchEvent`]s in field cell units and get back the
//! [`InputCommand`](blockweld_types::InputCommand)s the orchestrator queues.

pub mod gesture;

pub use blockweld_types as types;

pub use gesture::{Commands, GestureConfig, GestureInterpreter, TouchEvent};
