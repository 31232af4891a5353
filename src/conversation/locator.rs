//! Stateless traversal over an ordered batch of records.
//!
//! A conversation is the contiguous run `[header, item, item, …]` in store
//! order. Everything here works from `depth` and `conversation_count` alone
//! and clips to what the batch actually holds: a page that ends in the
//! middle of a conversation yields fewer items than the header announces.

use crate::model::record::MessageRecord;

/// Position of the record with `id` inside `batch`.
pub fn position_of(batch: &[MessageRecord], id: &str) -> Option<usize> {
    batch.iter().position(|r| r.id == id)
}

/// The items following the row at `index`: every consecutive record with
/// `depth > 0`, stopping at the next depth-0 record or the end of the batch.
pub fn items_after(batch: &[MessageRecord], index: usize) -> &[MessageRecord] {
    let start = (index + 1).min(batch.len());
    let len = batch[start..].iter().take_while(|r| r.depth > 0).count();
    &batch[start..start + len]
}

/// Items of the conversation headed by `header`.
///
/// Empty if `header` is not in `batch`. Never assume the length equals
/// `header.conversation_count`.
pub fn items_of<'a>(batch: &'a [MessageRecord], header: &MessageRecord) -> &'a [MessageRecord] {
    match position_of(batch, &header.id) {
        Some(index) => items_after(batch, index),
        None => &[],
    }
}

/// Index of the header owning the row at `index`.
///
/// A header resolves to itself, a standalone message to `None`. For an item
/// the batch is scanned backward for the nearest depth-0 record with
/// `conversation_count > 0`; reaching the start of the batch yields `None`.
pub fn header_index_of(batch: &[MessageRecord], index: usize) -> Option<usize> {
    let record = batch.get(index)?;
    if record.depth == 0 {
        return record.is_header().then_some(index);
    }
    batch[..index].iter().rposition(MessageRecord::is_header)
}

/// The header of the conversation `item` belongs to, if any.
pub fn header_of<'a>(
    batch: &'a [MessageRecord],
    item: &MessageRecord,
) -> Option<&'a MessageRecord> {
    let index = position_of(batch, &item.id)?;
    header_index_of(batch, index).map(|i| &batch[i])
}

/// The newest record of the conversation `record` belongs to.
///
/// Items are listed newest first, so this is the first item after the
/// header. Records outside any conversation resolve to themselves, as does
/// a header whose items are not in the batch.
pub fn newest_in_conversation<'a>(
    batch: &'a [MessageRecord],
    record: &'a MessageRecord,
) -> &'a MessageRecord {
    let Some(index) = position_of(batch, &record.id) else {
        return record;
    };
    let Some(header_index) = header_index_of(batch, index) else {
        return record;
    };
    items_after(batch, header_index)
        .first()
        .unwrap_or(&batch[header_index])
}
