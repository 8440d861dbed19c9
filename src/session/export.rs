//! CSV and JSON export of the practice log

use super::PracticeEntry;
use crate::{CadenceError, Result};
use std::io::Write;

/// Write entries as CSV with a header row
pub fn write_csv<W: Write>(entries: &[PracticeEntry], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for entry in entries {
        csv_writer.serialize(entry)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write entries as a pretty-printed JSON array
pub fn write_json<W: Write>(entries: &[PracticeEntry], writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, entries)
        .map_err(|e| CadenceError::Export(format!("Failed to write JSON: {}", e)))
}
