//! Native ATNF block format
//!
//! ```text
//! PSRJ     J0006+1834                    cnt96
//! P0       0.69374767047            14   cn95
//! DM       12.0                     6    cn95
//! @-----------------------------------------------------------------
//! ```
//!
//! A line starting with `@` closes the current block, `#` lines are
//! comments. The value of a keyword line is its second whitespace token;
//! uncertainty and reference tokens are ignored.

use std::io::BufRead;
use tracing::debug;

use super::stats::ParseStats;
use crate::config::BlockSchema;
use crate::constants::{BLOCK_TERMINATOR, COMMENT_PREFIX, ZERO_ECLIPTIC, ZERO_SEXAGESIMAL};
use crate::coordinates::{CoordinateFallback, Reconciliation, reconcile_coordinates};
use crate::error::{RecordError, Result};
use crate::models::{CatalogField, PulsarRecord, RecordBuilder};

pub(crate) fn parse_blocks<R: BufRead>(
    mut reader: R,
    schema: &BlockSchema,
    stats: &mut ParseStats,
    max_errors: usize,
) -> Result<Vec<PulsarRecord>> {
    let mut records = Vec::new();
    let mut block = BlockAccumulator::new(1);
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        let raw = buf.trim_ascii();

        if raw.first() == Some(&(COMMENT_PREFIX as u8)) {
            continue;
        }

        if raw.first() == Some(&(BLOCK_TERMINATOR as u8)) {
            let finished = std::mem::replace(&mut block, BlockAccumulator::new(line_number + 1));
            finished.finalize(schema, stats, max_errors, &mut records);
            continue;
        }

        match std::str::from_utf8(raw) {
            Ok(content) => block.absorb(content, schema),
            Err(e) => {
                block.lines_seen += 1;
                block.condemn(RecordError::Malformed {
                    reason: format!("line {} is not valid UTF-8: {}", line_number, e),
                });
            }
        }
    }

    // Trailing block without a closing terminator
    block.finalize(schema, stats, max_errors, &mut records);

    Ok(records)
}

/// Working state for the block currently being read
#[derive(Debug)]
struct BlockAccumulator {
    builder: RecordBuilder,
    start_line: usize,
    lines_seen: usize,
    fallback_name: Option<String>,
    error: Option<RecordError>,
}

impl BlockAccumulator {
    fn new(start_line: usize) -> Self {
        Self {
            builder: RecordBuilder::new(),
            start_line,
            lines_seen: 0,
            fallback_name: None,
            error: None,
        }
    }

    fn absorb(&mut self, line: &str, schema: &BlockSchema) {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return;
        };
        self.lines_seen += 1;

        let Some(value) = tokens.next() else {
            return;
        };

        if schema.fallback_name_keyword.as_deref() == Some(keyword) {
            self.fallback_name = Some(value.to_string());
            return;
        }

        let Some(field) = schema.field_for(keyword) else {
            return;
        };

        if let Err(e) = self.builder.set(field, value) {
            self.condemn(e);
        }
    }

    /// Mark the block as rejected, keeping the first error
    fn condemn(&mut self, error: RecordError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn finalize(
        mut self,
        schema: &BlockSchema,
        stats: &mut ParseStats,
        max_errors: usize,
        records: &mut Vec<PulsarRecord>,
    ) {
        if self.lines_seen == 0 {
            return;
        }

        let location = format!("block at line {}", self.start_line);

        if let Some(e) = self.error.take() {
            debug!("Rejected {}: {}", location, e);
            stats.record_rejected(&location, &e, max_errors);
            return;
        }

        if !self.builder.has(CatalogField::Name) {
            if let Some(name) = self.fallback_name.take() {
                // Text fields cannot fail
                let _ = self.builder.set(CatalogField::Name, &name);
            }
        }

        if self.builder.is_empty() {
            debug!("Skipping {} with no recognised fields", location);
            stats.record_skipped();
            return;
        }

        if schema.reconcile_coordinates {
            self.reconcile(&location, stats);
        }

        match self.builder.finish(&schema.required) {
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

    fn reconcile(&mut self, location: &str, stats: &mut ParseStats) {
        if self.builder.has(CatalogField::GalacticLongitude)
            && self.builder.has(CatalogField::GalacticLatitude)
        {
            return;
        }

        let reconciliation = match self.builder.position_inputs() {
            (None, None, None, None) => return,
            (ra, dec, elong, elat) => reconcile_coordinates(
                ra.unwrap_or(ZERO_SEXAGESIMAL),
                dec.unwrap_or(ZERO_SEXAGESIMAL),
                elong.unwrap_or(ZERO_ECLIPTIC),
                elat.unwrap_or(ZERO_ECLIPTIC),
            ),
        };

        match reconciliation {
            Reconciliation::FromEcliptic {
                right_ascension,
                declination,
                galactic,
            }
            | Reconciliation::FromEquatorial {
                right_ascension,
                declination,
                galactic,
            } => self.builder.set_derived_position(
                right_ascension,
                declination,
                galactic.l_deg,
                galactic.b_deg,
            ),
            Reconciliation::Unchanged { reason, .. } => {
                if reason != CoordinateFallback::NoPosition {
                    stats.coordinate_fallbacks += 1;
                }
                debug!("Position of {} left as given: {:?}", location, reason);
            }
        }
    }
}
