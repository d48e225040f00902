//! Catalogue parser orchestration
//!
//! Opens the source, hands it to the dialect selected in the
//! [`ParserConfig`] and collects records plus statistics. Only a source
//! that cannot be opened or read is an error; everything wrong inside the
//! text is counted in [`ParseStats`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

use super::block::parse_blocks;
use super::delimited::parse_delimited;
use super::stats::{ParseResult, ParseStats};
use crate::config::{CatalogDialect, ParserConfig};
use crate::error::{CatalogError, Result};

/// Parser for ATNF catalogue text in either dialect
#[derive(Debug, Clone)]
pub struct CatalogRecordParser {
    config: ParserConfig,
}

impl CatalogRecordParser {
    /// Create a parser, rejecting configurations that can never match a record
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a catalogue file
    pub fn parse_file(&self, path: &Path) -> Result<ParseResult> {
        info!(
            "Parsing {} catalogue: {}",
            self.config.dialect.name(),
            path.display()
        );

        let file = File::open(path).map_err(|e| CatalogError::source_unavailable(path, e))?;

        self.parse_reader(BufReader::new(file)).map_err(|e| match e {
            CatalogError::Io(source) => CatalogError::source_unavailable(path, source),
            other => other,
        })
    }

    /// Parse catalogue text held in memory
    pub fn parse_str(&self, text: &str) -> Result<ParseResult> {
        self.parse_reader(text.as_bytes())
    }

    /// Parse catalogue text from any buffered reader
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<ParseResult> {
        let mut stats = ParseStats::new();
        let max_errors = self.config.max_reported_errors;

        let records = match &self.config.dialect {
            CatalogDialect::Delimited(schema) => {
                parse_delimited(reader, schema, &mut stats, max_errors)?
            }
            CatalogDialect::Block(schema) => parse_blocks(reader, schema, &mut stats, max_errors)?,
        };

        info!(
            "Parsed {} records from {} chunks ({} rejected, {} skipped)",
            stats.records_parsed, stats.total_chunks, stats.records_rejected, stats.chunks_skipped
        );
        if records.is_empty() {
            warn!("Catalogue pass produced no records");
        }

        Ok(ParseResult { records, stats })
    }
}
