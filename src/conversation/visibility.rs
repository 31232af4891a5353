//! The predicate that turns a batch into the rendered projection.
//!
//! Depth-0 rows (headers and standalone messages) are always shown. An item
//! is shown only while some expanded header lists it.

use std::collections::HashSet;

use super::open_set::OpenSet;
use crate::model::record::MessageRecord;

/// Whether `record` is visible under `open_set`.
pub fn is_visible(open_set: &OpenSet, record: &MessageRecord) -> bool {
    record.depth == 0 || open_set.is_item_open(&record.id)
}

/// Owned snapshot of the shown item ids, installable into a list store.
///
/// It has to be rebuilt whenever the open set changes.
#[derive(Debug, Clone, Default)]
pub struct VisibilityFilter {
    shown_items: HashSet<String>,
}

impl VisibilityFilter {
    pub fn from_open_set(open_set: &OpenSet) -> Self {
        let shown_items = open_set
            .headers()
            .filter_map(|h| open_set.children(h))
            .flatten()
            .cloned()
            .collect();
        Self { shown_items }
    }

    pub fn matches(&self, record: &MessageRecord) -> bool {
        record.depth == 0 || self.shown_items.contains(&record.id)
    }

    /// Number of distinct items this filter lets through.
    pub fn shown_item_count(&self) -> usize {
        self.shown_items.len()
    }

    /// Box the filter as a predicate for [`crate::store::list::ListStore::filter_by`].
    pub fn into_predicate(self) -> Box<dyn Fn(&MessageRecord) -> bool> {
        Box::new(move |record| self.matches(record))
    }
}
