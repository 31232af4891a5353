//! Folder-aware item and conversation counts.
//!
//! A threaded Inbox also shows copies of thread participants that live in
//! other folders (a reply kept in Sent Items, for instance). Those rows are
//! visible but must not inflate the Inbox item count.

use crate::config::ThreadingConfig;
use crate::model::folder::FolderBinding;
use crate::model::record::MessageRecord;

/// Whether a store bound to `folder` renders conversations.
///
/// Requires the conversation view to be enabled, live-scroll loading (paged
/// loading cannot keep a conversation's rows together) and the bound folder
/// to be the configured primary folder.
pub fn is_threaded_view(config: &ThreadingConfig, folder: &FolderBinding) -> bool {
    config.enable_conversation_view
        && config.enable_live_scroll
        && folder.id == config.primary_folder_id
}

/// Number of messages the store holds, as shown to the user.
///
/// In threaded view without an explicit filter only records physically
/// stored in the primary folder count. Otherwise every record counts.
pub fn visible_item_count(
    batch: &[MessageRecord],
    primary_folder_label: &str,
    threaded: bool,
    explicit_filter: bool,
) -> usize {
    if !threaded || explicit_filter {
        return batch.len();
    }
    batch
        .iter()
        .filter(|r| r.folder_label == primary_folder_label)
        .count()
}

/// Number of depth-0 rows (conversations plus standalone messages).
///
/// Always computed over the unfiltered snapshot.
pub fn conversation_count(batch: &[MessageRecord]) -> usize {
    batch.iter().filter(|r| r.depth == 0).count()
}
