//! Plain-text and JSON rendering of a listing's live rows.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::{DisplayConfig, GeneralConfig};
use crate::store::mail::MailStore;

/// One line per live row: expansion marker, date, subject, folder.
pub fn listing_lines(
    store: &MailStore,
    display: &DisplayConfig,
    general: &GeneralConfig,
) -> Vec<String> {
    store
        .visible()
        .map(|record| {
            let marker = if record.is_header() {
                if store.open_set().contains_header(&record.id) {
                    "v"
                } else {
                    ">"
                }
            } else {
                " "
            };
            let unread = if record.unread { "*" } else { " " };
            let date = record
                .received
                .map(|d| d.format(&general.date_format).to_string())
                .unwrap_or_default();

            let indent = if record.is_conversation_item() {
                format!("{}\u{2514} ", " ".repeat(display.indent))
            } else {
                String::new()
            };
            let subject = if record.subject.is_empty() {
                record.id.as_str()
            } else {
                record.subject.as_str()
            };
            let avail = display
                .subject_width
                .saturating_sub(UnicodeWidthStr::width(indent.as_str()));
            let subject = format!("{indent}{}", truncate_str(subject, avail));
            let count = if record.is_header() {
                format!("({})", record.conversation_count)
            } else {
                String::new()
            };

            format!(
                "{marker}{unread} {date:<16} {subject:<width$} {count:>5} {}",
                record.folder_label,
                width = display.subject_width
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

/// The live rows and counts as a JSON document.
pub fn listing_json(store: &MailStore) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = store
        .visible()
        .map(|r| {
            serde_json::json!({
                "id": r.id,
                "depth": r.depth,
                "conversation_count": r.conversation_count,
                "folder": r.folder_label,
                "subject": r.subject,
                "unread": r.unread,
                "expanded": r.is_header() && store.open_set().contains_header(&r.id),
            })
        })
        .collect();

    serde_json::json!({
        "threaded": store.is_threaded_view(),
        "item_count": store.visible_item_count(),
        "conversation_count": store.conversation_count(),
        "rows": rows,
    })
}

/// Truncate a string to fit within `max_width` columns, adding "..." if needed.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let width = UnicodeWidthStr::width(s);
    if width <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let mut result = String::new();
        let mut current_width = 0;
        for ch in s.chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if current_width + ch_width + 3 > max_width {
                break;
            }
            result.push(ch);
            current_width += ch_width;
        }
        result.push_str("...");
        result
    }
}
