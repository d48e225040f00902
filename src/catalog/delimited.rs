//! Delimited (comma separated) catalogue exports
//!
//! Each non-blank line is one chunk; quotes are ordinary characters. Lines whose first field is `#` are
//! headers. Fields are picked by the column indices of the active
//! [`DelimitedSchema`]; a column the line does not have leaves its field
//! absent.

use csv::StringRecord;
use std::io::Read;
use tracing::debug;

use super::stats::ParseStats;
use crate::config::DelimitedSchema;
use crate::constants::HEADER_MARKER;
use crate::error::{RecordError, Result};
use crate::models::{PulsarRecord, RecordBuilder};

pub(crate) fn parse_delimited<R: Read>(
    reader: R,
    schema: &DelimitedSchema,
    stats: &mut ParseStats,
    max_errors: usize,
) -> Result<Vec<PulsarRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(schema.delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut row = StringRecord::new();

    loop {
        let line = csv_reader.position().line();
        match csv_reader.read_record(&mut row) {
            Ok(false) => break,
            Ok(true) => {
                let location = format!("line {}", row.position().map_or(line, |p| p.line()));

                if row.iter().all(str::is_empty) {
                    continue;
                }

                if is_header(&row) {
                    debug!("Skipping header at {}", location);
                    stats.record_skipped();
                    continue;
                }

                match parse_row(&row, schema) {
                    Ok(record) => {
                        records.push(record);
                        stats.record_parsed();
                    }
                    Err(e) => {
                        debug!("Rejected {}: {}", location, e);
                        stats.record_rejected(&location, &e, max_errors);
                    }
                }
            }
            Err(e) => {
                let reason = e.to_string();
                if let csv::ErrorKind::Io(io_error) = e.into_kind() {
                    return Err(io_error.into());
                }
                let location = format!("line {}", line);
                debug!("Rejected {}: {}", location, reason);
                stats.record_rejected(&location, &RecordError::Malformed { reason }, max_errors);
            }
        }
    }

    Ok(records)
}

/// `#,NAME,Gl(deg),...` and bare `#,` rows
pub(crate) fn is_header(row: &StringRecord) -> bool {
    row.get(0) == Some(HEADER_MARKER)
}

/// Build one record from the mapped columns of `row`
pub(crate) fn parse_row(
    row: &StringRecord,
    schema: &DelimitedSchema,
) -> std::result::Result<PulsarRecord, RecordError> {
    let mut builder = RecordBuilder::new();

    for (&field, &index) in &schema.columns {
        if let Some(raw) = row.get(index) {
            builder.set(field, raw)?;
        }
    }

    builder.finish(&schema.required)
}
