//! Conversation threading over a flat, server-ordered record batch.
//!
//! The batch is the arena: headers and their items are found by position,
//! never linked by reference, so an incremental load invalidates nothing
//! but the batch itself.

pub mod counting;
pub mod locator;
pub mod open_set;
pub mod reconcile;
pub mod visibility;

pub use open_set::OpenSet;
pub use reconcile::{reconcile, ReconcileOutcome};
pub use visibility::VisibilityFilter;
