//! Carries expansion state across reloads.
//!
//! After every load the open set is reconciled against the fresh batch:
//! a conversation that had any shown item stays expanded and absorbs the
//! items that just arrived, and a conversation whose shown items all
//! disappeared collapses instead of showing an empty expansion.

use tracing::debug;

use super::locator::items_after;
use super::open_set::OpenSet;
use crate::model::record::MessageRecord;

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// `(header id, item ids newly shown)` for every conversation that grew.
    pub absorbed: Vec<(String, Vec<String>)>,
    /// Headers that were collapsed because none of their items remain shown.
    pub collapsed: Vec<String>,
    /// Headers that became expanded during the pass.
    pub expanded: Vec<String>,
}

impl ReconcileOutcome {
    /// `true` if the open set was modified.
    pub fn changed(&self) -> bool {
        !self.absorbed.is_empty() || !self.collapsed.is_empty() || !self.expanded.is_empty()
    }
}

/// Reconcile `open_set` against a freshly loaded `batch`.
///
/// Every open/closed decision is taken against the state before the pass,
/// so running this twice on the same batch changes nothing the second time.
/// A header with none of its items present in the batch (a page cut right
/// after it) is left as it is.
pub fn reconcile(batch: &[MessageRecord], open_set: &mut OpenSet) -> ReconcileOutcome {
    let before = open_set.clone();
    let mut outcome = ReconcileOutcome::default();

    let mut i = 0;
    while i < batch.len() {
        let header = &batch[i];
        if !header.is_header() {
            i += 1;
            continue;
        }

        let items = items_after(batch, i);
        i += 1 + items.len();

        if items.is_empty() {
            continue;
        }

        let any_open = before.is_item_open(&header.id)
            || items.iter().any(|item| before.is_open(&item.id));

        if any_open {
            let was_expanded = open_set.contains_header(&header.id);
            let fresh: Vec<String> = items
                .iter()
                .filter(|item| !before.is_open(&item.id))
                .map(|item| item.id.clone())
                .collect();
            if open_set.absorb(&header.id, fresh.iter().cloned()) > 0 {
                outcome.absorbed.push((header.id.clone(), fresh));
            }
            if !was_expanded {
                outcome.expanded.push(header.id.clone());
            }
        } else if open_set.close(&header.id) {
            outcome.collapsed.push(header.id.clone());
        }
    }

    if outcome.changed() {
        debug!(
            absorbed = outcome.absorbed.len(),
            expanded = outcome.expanded.len(),
            collapsed = outcome.collapsed.len(),
            "Reconciled open conversations"
        );
    }

    outcome
}
