//! Message records as delivered by the list store.

use chrono::{DateTime, Utc};

/// A single row of a mail listing.
///
/// Conversations are not materialized as objects. A header row
/// (`depth == 0`, `conversation_count > 0`) is followed in store order by
/// the rows of its conversation, each with `depth > 0`. A depth-0 row with
/// `conversation_count == 0` is a standalone message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MessageRecord {
    /// Unique within one store instance (the server entry id).
    pub id: String,

    /// 0 for headers and standalone messages, >0 for conversation items.
    /// Only the distinction between zero and non-zero is meaningful.
    #[serde(default)]
    pub depth: u32,

    /// Number of items that follow a header. Ignored when `depth > 0`.
    #[serde(default)]
    pub conversation_count: u32,

    /// Name of the folder the message physically lives in
    /// (e.g. `"inbox"` or `"sent_items"`). Only used for counting.
    #[serde(default, alias = "folder_name")]
    pub folder_label: String,

    /// Decoded subject line.
    #[serde(default)]
    pub subject: String,

    /// Delivery time, if the server reported one.
    #[serde(default)]
    pub received: Option<DateTime<Utc>>,

    /// Whether the message is still unread.
    #[serde(default)]
    pub unread: bool,
}

impl MessageRecord {
    /// Create a bare record with no display metadata.
    pub fn new(
        id: impl Into<String>,
        depth: u32,
        conversation_count: u32,
        folder_label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            depth,
            conversation_count,
            folder_label: folder_label.into(),
            subject: String::new(),
            received: None,
            unread: false,
        }
    }

    /// A standalone message: depth 0, not part of any conversation.
    pub fn standalone(id: impl Into<String>, folder_label: impl Into<String>) -> Self {
        Self::new(id, 0, 0, folder_label)
    }

    /// A conversation header owning `count` following items.
    pub fn header(id: impl Into<String>, count: u32, folder_label: impl Into<String>) -> Self {
        Self::new(id, 0, count, folder_label)
    }

    /// An item of the conversation owned by the nearest preceding header.
    pub fn item(id: impl Into<String>, folder_label: impl Into<String>) -> Self {
        Self::new(id, 1, 0, folder_label)
    }

    /// Builder-style subject setter.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Builder-style unread flag setter.
    pub fn with_unread(mut self, unread: bool) -> Self {
        self.unread = unread;
        self
    }

    /// Builder-style delivery time setter.
    pub fn with_received(mut self, received: DateTime<Utc>) -> Self {
        self.received = Some(received);
        self
    }

    /// `true` for a depth-0 row that owns at least one item.
    pub fn is_header(&self) -> bool {
        self.depth == 0 && self.conversation_count > 0
    }

    /// `true` for a depth-0 row that is not a conversation.
    pub fn is_standalone(&self) -> bool {
        self.depth == 0 && self.conversation_count == 0
    }

    /// `true` for a row that belongs to some conversation.
    pub fn is_conversation_item(&self) -> bool {
        self.depth > 0
    }
}
