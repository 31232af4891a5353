//! `convlist`: conversation threading for mail list stores.
//!
//! A mail listing arrives from the server as a flat, ordered batch in which
//! a conversation is a header row followed by its items. This crate keeps
//! track of which conversations the user expanded, carries that state
//! across reloads and live-scroll appends, filters the batch down to the
//! rows that should be rendered, and counts messages without counting
//! twice the thread participants stored in another folder.

pub mod batch;
pub mod config;
pub mod conversation;
pub mod error;
pub mod model;
pub mod render;
pub mod store;

pub use conversation::{OpenSet, ReconcileOutcome, VisibilityFilter};
pub use error::{ConvlistError, Result};
pub use model::folder::{FolderBinding, FolderId};
pub use model::record::MessageRecord;
pub use store::{ListStore, LoadRequest, MailStore, ViewChange};
