//! Tracks which conversations are expanded and which of their items are shown.
//!
//! Presence of a header id as a key means the conversation is expanded. The
//! value is the ordered list of item ids currently shown for it, which is
//! not necessarily every item the header owns in the latest batch.

use std::collections::HashMap;

/// In-memory expansion state for one store instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenSet {
    /// Header id → ordered, duplicate-free item ids.
    entries: HashMap<String, Vec<String>>,
    /// Item id → number of header lists containing it.
    members: HashMap<String, usize>,
}

impl OpenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if `id` is an expanded header or an item listed under any header.
    pub fn is_open(&self, id: &str) -> bool {
        self.entries.contains_key(id) || self.members.contains_key(id)
    }

    /// `true` if `id` is listed as a shown item under some header.
    pub fn is_item_open(&self, id: &str) -> bool {
        self.members.contains_key(id)
    }

    /// `true` if `header_id` is currently expanded.
    pub fn contains_header(&self, header_id: &str) -> bool {
        self.entries.contains_key(header_id)
    }

    /// The item ids shown for an expanded header.
    pub fn children(&self, header_id: &str) -> Option<&[String]> {
        self.entries.get(header_id).map(Vec::as_slice)
    }

    /// Ids of all expanded headers, in no particular order.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of expanded conversations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expand `header_id` showing exactly `child_ids`, replacing any prior list.
    pub fn open<I, S>(&mut self, header_id: impl Into<String>, child_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let header_id = header_id.into();
        if let Some(previous) = self.entries.remove(&header_id) {
            self.unindex_all(&previous);
        }

        let mut list: Vec<String> = Vec::new();
        for id in child_ids {
            let id = id.into();
            if !list.contains(&id) {
                list.push(id);
            }
        }
        self.index_all(&list);
        self.entries.insert(header_id, list);
    }

    /// Append the ids not yet listed under `header_id`, in the order given.
    ///
    /// Expands the header if it was collapsed. Returns how many ids were added.
    pub fn absorb<I, S>(&mut self, header_id: &str, extra_ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = self.entries.entry(header_id.to_string()).or_default();
        let mut added: Vec<String> = Vec::new();
        for id in extra_ids {
            let id = id.into();
            if !list.contains(&id) {
                list.push(id.clone());
                added.push(id);
            }
        }
        self.index_all(&added);
        added.len()
    }

    /// Collapse `header_id`. Returns `false` if it was not expanded.
    pub fn close(&mut self, header_id: &str) -> bool {
        match self.entries.remove(header_id) {
            Some(list) => {
                self.unindex_all(&list);
                true
            }
            None => false,
        }
    }

    /// Collapse every conversation except `keep` (or all of them when `None`).
    pub fn close_all_except(&mut self, keep: Option<&str>) {
        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|k| Some(k.as_str()) != keep)
            .cloned()
            .collect();
        for header_id in doomed {
            self.close(&header_id);
        }
    }

    fn index_all(&mut self, ids: &[String]) {
        for id in ids {
            *self.members.entry(id.clone()).or_insert(0) += 1;
        }
    }

    fn unindex_all(&mut self, ids: &[String]) {
        for id in ids {
            if let Some(n) = self.members.get_mut(id) {
                *n -= 1;
                if *n == 0 {
                    self.members.remove(id);
                }
            }
        }
    }
}
