//! Parameters for the next load issued against the list store.

use crate::model::record::MessageRecord;

/// Server-side restriction attached to a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restriction {
    /// Only unread messages, plus `keep` (the record in the preview pane)
    /// so it does not vanish from under the reader.
    Unread { keep: Option<String> },
}

impl Restriction {
    /// Evaluate the restriction locally.
    pub fn matches(&self, record: &MessageRecord) -> bool {
        match self {
            Self::Unread { keep } => record.unread || keep.as_deref() == Some(record.id.as_str()),
        }
    }
}

/// Options for one load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Drop any load still in flight when this one is issued.
    pub cancel_previous: bool,
    /// Restriction the server should apply, if any.
    pub restriction: Option<Restriction>,
}

impl Default for LoadRequest {
    fn default() -> Self {
        Self {
            cancel_previous: true,
            restriction: None,
        }
    }
}

impl LoadRequest {
    /// Apply the restriction to a batch, keeping conversation runs intact.
    ///
    /// A header survives if it or any of its items match; its surviving
    /// items follow it. Items whose header was dropped are dropped too.
    pub fn apply(&self, batch: Vec<MessageRecord>) -> Vec<MessageRecord> {
        let Some(restriction) = &self.restriction else {
            return batch;
        };

        let mut out: Vec<MessageRecord> = Vec::with_capacity(batch.len());
        let mut iter = batch.into_iter().peekable();
        while let Some(record) = iter.next() {
            if record.depth > 0 {
                // Orphan item with no header before it.
                continue;
            }
            let mut items: Vec<MessageRecord> = Vec::new();
            while let Some(item) = iter.next_if(|r| r.depth > 0) {
                if restriction.matches(&item) {
                    items.push(item);
                }
            }
            if !restriction.matches(&record) && items.is_empty() {
                continue;
            }
            let mut head = record;
            if head.conversation_count > 0 {
                head.conversation_count = items.len() as u32;
            }
            out.push(head);
            out.extend(items);
        }
        out
    }
}
