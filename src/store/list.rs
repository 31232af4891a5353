//! Ordered, filterable record store.
//!
//! Keeps the full loaded batch (the snapshot) and a filtered live view over
//! it. The live view is a list of indices into the snapshot, so installing
//! or clearing a filter never copies records.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{ConvlistError, Result};
use crate::model::record::MessageRecord;

/// Predicate deciding which snapshot rows appear in the live view.
pub type RecordPredicate = Box<dyn Fn(&MessageRecord) -> bool>;

/// Handle identifying one issued load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn number(self) -> u64 {
        self.0
    }
}

/// A snapshot plus a filtered live view.
#[derive(Default)]
pub struct ListStore {
    /// Every record of the latest accepted load, in server order.
    snapshot: Vec<MessageRecord>,
    /// Record id → index in `snapshot` (first occurrence wins).
    positions: HashMap<String, usize>,
    /// Indices into `snapshot` of the rows passing the filter.
    live: Vec<usize>,
    /// Installed filter, if any.
    filter: Option<RecordPredicate>,

    // ── Load sequencing ───────────────────────
    /// Last ticket handed out.
    issued: u64,
    /// Tickets below this were cancelled by a newer load.
    min_accepted: u64,
    /// Ticket of the batch currently held.
    applied: u64,
}

impl std::fmt::Debug for ListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListStore")
            .field("total", &self.snapshot.len())
            .field("live", &self.live.len())
            .field("filtered", &self.filter.is_some())
            .field("issued", &self.issued)
            .field("applied", &self.applied)
            .finish()
    }
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Loading ───────────────────────────────

    /// Issue a ticket for a new load.
    ///
    /// With `cancel_previous`, every load issued before this one is dropped
    /// when it completes.
    pub fn begin_load(&mut self, cancel_previous: bool) -> LoadTicket {
        self.issued += 1;
        if cancel_previous {
            self.min_accepted = self.issued;
        }
        debug!(ticket = self.issued, cancel_previous, "Load issued");
        LoadTicket(self.issued)
    }

    /// Replace the snapshot with the batch of a completed load.
    ///
    /// Fails with [`ConvlistError::StaleLoad`] (leaving the store untouched)
    /// if the load was cancelled or an answer to a newer load is already held.
    pub fn complete_load(&mut self, ticket: LoadTicket, batch: Vec<MessageRecord>) -> Result<()> {
        if ticket.0 < self.min_accepted || ticket.0 < self.applied {
            warn!(
                ticket = ticket.0,
                current = self.issued,
                "Dropping stale load"
            );
            return Err(ConvlistError::StaleLoad {
                ticket: ticket.0,
                current: self.issued,
            });
        }
        self.applied = ticket.0;
        self.replace(batch);
        Ok(())
    }

    /// Replace the snapshot directly, bypassing load sequencing.
    pub fn replace(&mut self, batch: Vec<MessageRecord>) {
        self.positions.clear();
        for (i, record) in batch.iter().enumerate() {
            self.positions.entry(record.id.clone()).or_insert(i);
        }
        self.snapshot = batch;
        self.refresh_live();
    }

    // ── Filtering ─────────────────────────────

    /// Install `predicate`, replacing any previous filter.
    pub fn filter_by(&mut self, predicate: RecordPredicate) {
        self.filter = Some(predicate);
        self.refresh_live();
    }

    /// Remove the filter so every snapshot row is live.
    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.refresh_live();
    }

    pub fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    fn refresh_live(&mut self) {
        self.live = match &self.filter {
            Some(pred) => self
                .snapshot
                .iter()
                .enumerate()
                .filter(|&(_, r)| pred(r))
                .map(|(i, _)| i)
                .collect(),
            None => (0..self.snapshot.len()).collect(),
        };
    }

    // ── Access ────────────────────────────────

    /// The unfiltered batch in server order.
    pub fn snapshot(&self) -> &[MessageRecord] {
        &self.snapshot
    }

    /// Live rows in order.
    pub fn visible(&self) -> impl Iterator<Item = &MessageRecord> {
        self.live.iter().map(|&i| &self.snapshot[i])
    }

    /// Number of live rows.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of rows in the snapshot.
    pub fn total_len(&self) -> usize {
        self.snapshot.len()
    }

    /// Live row at `index`.
    pub fn at(&self, index: usize) -> Option<&MessageRecord> {
        self.live.get(index).map(|&i| &self.snapshot[i])
    }

    /// Record with `id`, whether live or filtered out.
    pub fn get(&self, id: &str) -> Option<&MessageRecord> {
        self.positions.get(id).map(|&i| &self.snapshot[i])
    }

    /// Live row index of `id`, `None` if unknown or filtered out.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        let pos = *self.positions.get(id)?;
        self.live.binary_search(&pos).ok()
    }

    /// Snapshot index of `id`.
    pub fn snapshot_index_of(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Live rows `start..=end`, clipped to the live view.
    pub fn get_range(&self, start: usize, end: usize) -> Vec<&MessageRecord> {
        if start >= self.live.len() || start > end {
            return Vec::new();
        }
        let end = end.min(self.live.len() - 1);
        self.live[start..=end]
            .iter()
            .map(|&i| &self.snapshot[i])
            .collect()
    }
}
