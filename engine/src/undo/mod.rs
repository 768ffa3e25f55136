//! Undo/redo of component edits
//!
//! Edits are expressed as [`Command`]s over [`ComponentState`] snapshots and
//! recorded in a [`CommandStack`]. Entity destruction is not recorded; a
//! command whose entity has been destroyed becomes a no-op.

pub mod commands;
pub mod stack;
pub mod state;

pub use commands::Command;
pub use stack::CommandStack;
pub use state::{ComponentKind, ComponentState, PhysicsState, TransformState};
