//! Reading record batches from JSON files.
//!
//! A batch file is either a bare JSON array of records or an object with a
//! `records` array, the shape the list module returns:
//!
//! ```json
//! { "records": [ { "id": "h1", "depth": 0, "conversation_count": 1, "folder_name": "inbox" } ] }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ConvlistError, Result};
use crate::model::record::MessageRecord;

#[derive(Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Bare(Vec<MessageRecord>),
    Wrapped { records: Vec<MessageRecord> },
}

/// Read a record batch from `path`.
pub fn read_batch(path: &Path) -> Result<Vec<MessageRecord>> {
    if !path.exists() {
        return Err(ConvlistError::FileNotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path).map_err(|e| ConvlistError::io(path, e))?;
    let records = parse_batch(&contents).map_err(|reason| ConvlistError::InvalidBatch {
        path: path.to_path_buf(),
        reason,
    })?;
    debug!(path = %path.display(), count = records.len(), "Read record batch");
    Ok(records)
}

/// Parse a record batch from JSON text.
pub fn parse_batch(json: &str) -> std::result::Result<Vec<MessageRecord>, String> {
    match serde_json::from_str::<BatchFile>(json) {
        Ok(BatchFile::Bare(records)) | Ok(BatchFile::Wrapped { records }) => Ok(records),
        Err(e) => Err(e.to_string()),
    }
}
