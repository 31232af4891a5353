//! Mail listing for one folder with conversation threading.
//!
//! `MailStore` owns the list store and the open set of that listing and is
//! the only thing that mutates either. Every change to the open set is
//! followed by re-installing the visibility filter and notifying
//! subscribers.

use tracing::debug;

use crate::config::ThreadingConfig;
use crate::conversation::counting;
use crate::conversation::locator;
use crate::conversation::{reconcile, OpenSet, ReconcileOutcome, VisibilityFilter};
use crate::error::Result;
use crate::model::folder::FolderBinding;
use crate::model::record::MessageRecord;
use crate::store::list::{ListStore, LoadTicket};
use crate::store::request::{LoadRequest, Restriction};

/// What made the live view change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewChange {
    /// A conversation was expanded.
    Expanded { header: String },
    /// A conversation was collapsed.
    Collapsed { header: String },
    /// Every conversation but `kept` was collapsed.
    CollapsedAll { kept: Option<String> },
    /// A load changed which conversations are expanded.
    Reconciled(ReconcileOutcome),
}

type Listener = Box<dyn FnMut(&ViewChange)>;

/// Threaded mail listing bound to a single folder.
pub struct MailStore {
    list: ListStore,
    open_set: OpenSet,
    folder: FolderBinding,
    threading: ThreadingConfig,
    /// An explicit (unread) filter is active on the server side.
    unread_filter: bool,
    /// Record currently shown in the preview pane.
    preview: Option<String>,
    /// Bumped every time the visibility filter is re-installed.
    revision: u64,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for MailStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailStore")
            .field("folder", &self.folder)
            .field("list", &self.list)
            .field("open_set", &self.open_set)
            .field("unread_filter", &self.unread_filter)
            .field("revision", &self.revision)
            .finish()
    }
}

impl MailStore {
    pub fn new(folder: FolderBinding, threading: ThreadingConfig) -> Self {
        Self {
            list: ListStore::new(),
            open_set: OpenSet::new(),
            folder,
            threading,
            unread_filter: false,
            preview: None,
            revision: 0,
            listeners: Vec::new(),
        }
    }

    // ── Accessors ─────────────────────────────

    pub fn folder(&self) -> &FolderBinding {
        &self.folder
    }

    pub fn threading(&self) -> &ThreadingConfig {
        &self.threading
    }

    pub fn open_set(&self) -> &OpenSet {
        &self.open_set
    }

    pub fn list(&self) -> &ListStore {
        &self.list
    }

    /// The unfiltered batch.
    pub fn snapshot(&self) -> &[MessageRecord] {
        self.list.snapshot()
    }

    /// Rows as rendered, reflecting the current expansion state.
    pub fn visible(&self) -> impl Iterator<Item = &MessageRecord> {
        self.list.visible()
    }

    /// Number of times the visibility filter has been re-installed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Register a callback fired on every view change.
    pub fn subscribe(&mut self, listener: impl FnMut(&ViewChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Whether this listing renders conversations.
    pub fn is_threaded_view(&self) -> bool {
        counting::is_threaded_view(&self.threading, &self.folder)
    }

    // ── Explicit filter ───────────────────────

    /// Turn the unread-only filter on or off for subsequent loads.
    pub fn set_unread_filter(&mut self, enabled: bool) {
        self.unread_filter = enabled;
    }

    /// Whether an explicit non-threading filter is applied.
    pub fn has_filter_applied(&self) -> bool {
        self.unread_filter
    }

    /// Record the id shown in the preview pane (kept by the unread filter).
    pub fn set_preview(&mut self, id: Option<String>) {
        self.preview = id;
    }

    /// Options for the next (re)load of this listing.
    pub fn load_request(&self) -> LoadRequest {
        let restriction = self.unread_filter.then(|| Restriction::Unread {
            keep: self.preview.clone(),
        });
        LoadRequest {
            cancel_previous: true,
            restriction,
        }
    }

    // ── Loading ───────────────────────────────

    /// Issue a ticket for a load described by `request`.
    pub fn begin_load(&mut self, request: &LoadRequest) -> LoadTicket {
        self.list.begin_load(request.cancel_previous)
    }

    /// Accept the batch of a completed load.
    ///
    /// Stale loads are rejected without touching any state. In threaded view
    /// the open set is reconciled against the new batch and the visibility
    /// filter re-installed; otherwise the flat batch is shown unfiltered.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        batch: Vec<MessageRecord>,
    ) -> Result<ReconcileOutcome> {
        self.list.complete_load(ticket, batch)?;

        if !self.is_threaded_view() {
            self.list.clear_filter();
            return Ok(ReconcileOutcome::default());
        }

        let outcome = reconcile(self.list.snapshot(), &mut self.open_set);
        self.install_filter();
        if outcome.changed() {
            self.notify(ViewChange::Reconciled(outcome.clone()));
        }
        Ok(outcome)
    }

    /// Issue and complete a load in one step.
    pub fn load(&mut self, batch: Vec<MessageRecord>) -> Result<ReconcileOutcome> {
        let ticket = self.begin_load(&LoadRequest::default());
        self.complete_load(ticket, batch)
    }

    // ── Conversations ─────────────────────────

    /// Header of the conversation containing the record `id`.
    pub fn header_of(&self, id: &str) -> Option<&MessageRecord> {
        let snapshot = self.list.snapshot();
        let index = self.list.snapshot_index_of(id)?;
        locator::header_index_of(snapshot, index).map(|i| &snapshot[i])
    }

    /// Items of the conversation headed by `header_id`, clipped to the batch.
    pub fn items_of(&self, header_id: &str) -> &[MessageRecord] {
        match self.list.snapshot_index_of(header_id) {
            Some(index) => locator::items_after(self.list.snapshot(), index),
            None => &[],
        }
    }

    /// Newest record of the conversation containing `id`.
    pub fn newest_in_conversation(&self, id: &str) -> Option<&MessageRecord> {
        let record = self.list.get(id)?;
        Some(locator::newest_in_conversation(
            self.list.snapshot(),
            record,
        ))
    }

    /// Whether `id` is an expanded header or a shown item.
    pub fn is_conversation_opened(&self, id: &str) -> bool {
        self.open_set.is_open(id)
    }

    /// Expand the conversation containing `id`.
    ///
    /// Returns `false` (doing nothing) if `id` is not part of a conversation.
    pub fn expand(&mut self, id: &str) -> bool {
        let Some(header_id) = self.header_id_of(id) else {
            return false;
        };
        let items: Vec<String> = self
            .items_of(&header_id)
            .iter()
            .map(|r| r.id.clone())
            .collect();
        debug!(header = %header_id, items = items.len(), "Expanding conversation");
        self.open_set.open(header_id.clone(), items);
        self.install_filter();
        self.notify(ViewChange::Expanded { header: header_id });
        true
    }

    /// Collapse the conversation containing `id`.
    ///
    /// Returns `false` (doing nothing) if `id` is not part of a conversation.
    pub fn collapse(&mut self, id: &str) -> bool {
        let Some(header_id) = self.header_id_of(id) else {
            return false;
        };
        debug!(header = %header_id, "Collapsing conversation");
        self.open_set.close(&header_id);
        self.install_filter();
        self.notify(ViewChange::Collapsed { header: header_id });
        true
    }

    /// Expand or collapse the conversation containing `id`.
    ///
    /// `Some(true)` expands, `Some(false)` collapses, `None` flips the
    /// current state.
    pub fn toggle(&mut self, id: &str, expand: Option<bool>) -> bool {
        let Some(header_id) = self.header_id_of(id) else {
            return false;
        };
        let expand = expand.unwrap_or_else(|| !self.open_set.is_open(&header_id));
        if expand {
            self.expand(&header_id)
        } else {
            self.collapse(&header_id)
        }
    }

    /// Collapse every conversation except the one containing `except`.
    pub fn collapse_all(&mut self, except: Option<&str>) {
        let kept = except.and_then(|id| self.header_id_of(id));
        debug!(kept = ?kept, "Collapsing all conversations");
        self.open_set.close_all_except(kept.as_deref());
        self.install_filter();
        self.notify(ViewChange::CollapsedAll { kept });
    }

    /// Close the conversation of a selected item and pick the row to select
    /// next.
    ///
    /// Only acts when `selected` is a conversation item. Returns the live
    /// row above the header, or the row below it when the header is the
    /// first row. `None` if nothing was collapsed or no other row is left.
    pub fn close_selected_conversation(&mut self, selected: &str) -> Option<usize> {
        if !self.list.get(selected)?.is_conversation_item() {
            return None;
        }
        let header_id = self.header_id_of(selected)?;
        self.collapse(&header_id);

        let row = self.list.index_of(&header_id)?;
        if row > 0 {
            Some(row - 1)
        } else if row + 1 < self.list.len() {
            Some(row + 1)
        } else {
            None
        }
    }

    // ── Counting ──────────────────────────────

    /// Number of messages in this listing, as shown to the user.
    pub fn visible_item_count(&self) -> usize {
        counting::visible_item_count(
            self.list.snapshot(),
            &self.threading.primary_folder_label,
            self.is_threaded_view(),
            self.unread_filter,
        )
    }

    /// Number of depth-0 rows in the unfiltered batch.
    pub fn conversation_count(&self) -> usize {
        counting::conversation_count(self.list.snapshot())
    }

    // ── Internals ─────────────────────────────

    fn header_id_of(&self, id: &str) -> Option<String> {
        self.header_of(id).map(|h| h.id.clone())
    }

    fn install_filter(&mut self) {
        if self.is_threaded_view() {
            let filter = VisibilityFilter::from_open_set(&self.open_set);
            self.list.filter_by(filter.into_predicate());
        } else {
            self.list.clear_filter();
        }
        self.revision += 1;
    }

    fn notify(&mut self, change: ViewChange) {
        for listener in &mut self.listeners {
            listener(&change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn inbox_store() -> MailStore {
        MailStore::new(FolderBinding::new("inbox", "inbox"), ThreadingConfig::default())
    }

    fn scenario_batch() -> Vec<MessageRecord> {
        vec![
            MessageRecord::header("H1", 2, "inbox"),
            MessageRecord::item("I1", "inbox"),
            MessageRecord::item("I2", "sent"),
            MessageRecord::header("H2", 0, "inbox"),
        ]
    }

    fn visible_ids(store: &MailStore) -> Vec<String> {
        store.visible().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut store = inbox_store();
        store.load(scenario_batch()).unwrap();
        assert_eq!(visible_ids(&store), vec!["H1", "H2"]);

        assert!(store.expand("H1"));
        assert_eq!(visible_ids(&store), vec!["H1", "I1", "I2", "H2"]);

        store.collapse_all(None);
        assert_eq!(visible_ids(&store), vec!["H1", "H2"]);
    }

    #[test]
    fn test_expand_collapse_round_trip() {
        let mut store = inbox_store();
        store.load(scenario_batch()).unwrap();
        let before = visible_ids(&store);
        store.expand("H1");
        store.collapse("H1");
        assert_eq!(visible_ids(&store), before);
    }

    #[test]
    fn test_toggle_from_item_acts_on_header() {
        let mut store = inbox_store();
        store.load(scenario_batch()).unwrap();
        store.expand("H1");

        assert!(store.toggle("I2", None));
        assert!(!store.open_set().contains_header("H1"));
        assert!(store.toggle("I1", Some(true)));
        assert!(store.open_set().contains_header("H1"));
        assert!(store.toggle("H1", Some(true)));
        assert!(store.open_set().contains_header("H1"));
    }

    #[test]
    fn test_toggle_standalone_is_noop() {
        let mut store = inbox_store();
        store.load(scenario_batch()).unwrap();
        let rev = store.revision();
        assert!(!store.toggle("H2", None));
        assert!(!store.expand("H2"));
        assert!(!store.collapse("unknown"));
        assert_eq!(store.revision(), rev);
        assert!(store.open_set().is_empty());
    }

    #[test]
    fn test_reload_absorbs_new_items() {
        let mut store = inbox_store();
        store.load(scenario_batch()).unwrap();
        store.expand("H1");

        let mut next = scenario_batch();
        next[0].conversation_count = 3;
        next.insert(1, MessageRecord::item("I0", "inbox"));
        let outcome = store.load(next).unwrap();

        assert!(outcome.changed());
        assert_eq!(visible_ids(&store), vec!["H1", "I0", "I1", "I2", "H2"]);
    }

    #[test]
    fn test_reload_auto_collapses() {
        let mut store = inbox_store();
        store.load(scenario_batch()).unwrap();
        store.expand("H1");

        let next = vec![
            MessageRecord::header("H1", 1, "inbox"),
            MessageRecord::item("I7", "inbox"),
            MessageRecord::header("H2", 0, "inbox"),
        ];
        let outcome = store.load(next).unwrap();
        assert_eq!(outcome.collapsed, vec!["H1".to_string()]);
        assert_eq!(visible_ids(&store), vec!["H1", "H2"]);
    }

    #[test]
    fn test_stale_load_is_dropped() {
        let mut store = inbox_store();
        let old = store.begin_load(&LoadRequest::default());
        let new = store.begin_load(&LoadRequest::default());
        store.complete_load(new, scenario_batch()).unwrap();
        assert!(store
            .complete_load(old, vec![MessageRecord::standalone("X", "inbox")])
            .is_err());
        assert_eq!(store.conversation_count(), 2);
    }

    #[test]
    fn test_notifications() {
        let seen: Rc<RefCell<Vec<ViewChange>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut store = inbox_store();
        store.subscribe(move |change| sink.borrow_mut().push(change.clone()));
        store.load(scenario_batch()).unwrap();
        store.expand("I1");
        store.collapse_all(Some("I1"));

        let seen = seen.borrow();
        assert_eq!(
            *seen,
            vec![
                ViewChange::Expanded {
                    header: "H1".to_string()
                },
                ViewChange::CollapsedAll {
                    kept: Some("H1".to_string())
                },
            ]
        );
    }

    #[test]
    fn test_counts_in_threaded_view() {
        let mut store = inbox_store();
        store.load(scenario_batch()).unwrap();
        assert!(store.is_threaded_view());
        assert_eq!(store.visible_item_count(), 3);
        assert_eq!(store.conversation_count(), 2);

        store.set_unread_filter(true);
        assert_eq!(store.visible_item_count(), 4);
    }

    #[test]
    fn test_flat_view_outside_primary_folder() {
        let mut store = MailStore::new(
            FolderBinding::new("sent", "sent"),
            ThreadingConfig::default(),
        );
        let outcome = store.load(scenario_batch()).unwrap();
        assert!(!outcome.changed());
        assert!(!store.is_threaded_view());
        assert_eq!(visible_ids(&store).len(), 4);
        assert_eq!(store.visible_item_count(), 4);
    }

    #[test]
    fn test_close_selected_conversation() {
        let mut store = inbox_store();
        let mut batch = vec![MessageRecord::standalone("S0", "inbox")];
        batch.extend(scenario_batch());
        store.load(batch).unwrap();
        store.expand("H1");

        // Selection is an item: collapse and select the row above H1.
        assert_eq!(store.close_selected_conversation("I2"), Some(0));
        assert!(!store.open_set().contains_header("H1"));

        // Headers and standalone rows are not handled.
        store.expand("H1");
        assert_eq!(store.close_selected_conversation("H1"), None);
        assert!(store.open_set().contains_header("H1"));
    }

    #[test]
    fn test_close_selected_conversation_at_top_selects_below() {
        let mut store = inbox_store();
        store.load(scenario_batch()).unwrap();
        store.expand("H1");
        assert_eq!(store.close_selected_conversation("I1"), Some(1));
    }

    #[test]
    fn test_load_request_carries_unread_restriction() {
        let mut store = inbox_store();
        assert_eq!(store.load_request().restriction, None);

        store.set_unread_filter(true);
        store.set_preview(Some("I1".to_string()));
        assert_eq!(
            store.load_request().restriction,
            Some(Restriction::Unread {
                keep: Some("I1".to_string())
            })
        );
    }

    #[test]
    fn test_newest_in_conversation() {
        let mut store = inbox_store();
        store.load(scenario_batch()).unwrap();
        let newest = |id| store.newest_in_conversation(id).map(|r| r.id.as_str());
        assert_eq!(newest("I2"), Some("I1"));
        assert_eq!(newest("H2"), Some("H2"));
        assert!(store.newest_in_conversation("nope").is_none());
    }

    #[test]
    fn test_reload_notifies_only_when_open_set_changes() {
        let seen: Rc<RefCell<Vec<ViewChange>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut store = inbox_store();
        store.subscribe(move |change| sink.borrow_mut().push(change.clone()));
        store
            .load(vec![
                MessageRecord::header("H1", 1, "inbox"),
                MessageRecord::item("I1", "inbox"),
            ])
            .unwrap();
        store.expand("H1");

        let next = vec![
            MessageRecord::header("H1", 2, "inbox"),
            MessageRecord::item("I1", "inbox"),
            MessageRecord::item("I2", "inbox"),
        ];
        store.load(next.clone()).unwrap();
        let absorbed = ReconcileOutcome {
            absorbed: vec![("H1".to_string(), vec!["I2".to_string()])],
            ..ReconcileOutcome::default()
        };
        assert_eq!(
            *seen.borrow(),
            vec![
                ViewChange::Expanded {
                    header: "H1".to_string()
                },
                ViewChange::Reconciled(absorbed),
            ]
        );

        // Same batch again: nothing to reconcile, nothing reported.
        let outcome = store.load(next).unwrap();
        assert!(!outcome.changed());
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_is_conversation_opened() {
        let mut store = inbox_store();
        let mut batch = scenario_batch();
        batch.push(MessageRecord::header("H3", 1, "inbox"));
        batch.push(MessageRecord::item("J1", "inbox"));
        store.load(batch).unwrap();
        assert!(!store.is_conversation_opened("H1"));
        assert!(!store.is_conversation_opened("I1"));

        store.expand("H1");
        assert!(store.is_conversation_opened("H1"));
        assert!(store.is_conversation_opened("I2"));
        assert!(!store.is_conversation_opened("J1"));
        assert!(!store.is_conversation_opened("H3"));
    }

    #[test]
    fn test_close_selected_conversation_with_nothing_else_listed() {
        let mut store = inbox_store();
        store
            .load(vec![
                MessageRecord::header("H1", 1, "inbox"),
                MessageRecord::item("I1", "inbox"),
            ])
            .unwrap();
        store.expand("H1");

        assert_eq!(store.close_selected_conversation("I1"), None);
        assert!(!store.open_set().contains_header("H1"));
        assert_eq!(visible_ids(&store), vec!["H1"]);
    }
}
