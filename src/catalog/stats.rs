//! Parse statistics and result structures for catalogue passes
//!
//! Every input chunk (a delimited line or a keyword block) ends up in exactly
//! one bucket: parsed into a record, rejected, or skipped as header/empty.

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::models::PulsarRecord;

/// Records produced by one parse pass together with its statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Accepted records in input order
    pub records: Vec<PulsarRecord>,

    pub stats: ParseStats,
}

/// Counters collected while parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Lines or blocks encountered, blank ones excluded
    pub total_chunks: usize,

    /// Chunks that became records
    pub records_parsed: usize,

    /// Chunks dropped because a field failed to parse or a required field was missing
    pub records_rejected: usize,

    /// Header lines and blocks without any recognised field
    pub chunks_skipped: usize,

    /// Blocks whose position could not be turned into galactic coordinates
    pub coordinate_fallbacks: usize,

    /// Rejection messages, capped by the parser configuration
    pub errors: Vec<String>,
}

impl ParseStats {
    pub fn new() -> Self {
        Self {
            total_chunks: 0,
            records_parsed: 0,
            records_rejected: 0,
            chunks_skipped: 0,
            coordinate_fallbacks: 0,
            errors: Vec::new(),
        }
    }

    pub(crate) fn record_parsed(&mut self) {
        self.total_chunks += 1;
        self.records_parsed += 1;
    }

    pub(crate) fn record_skipped(&mut self) {
        self.total_chunks += 1;
        self.chunks_skipped += 1;
    }

    pub(crate) fn record_rejected(&mut self, location: &str, error: &RecordError, max_errors: usize) {
        self.total_chunks += 1;
        self.records_rejected += 1;
        if self.errors.len() < max_errors {
            self.errors.push(format!("{}: {}", location, error));
        }
    }

    /// Percentage of data chunks (headers and empty blocks excluded) that became records
    pub fn success_rate(&self) -> f64 {
        let candidates = self.records_parsed + self.records_rejected;
        if candidates == 0 {
            0.0
        } else {
            (self.records_parsed as f64 / candidates as f64) * 100.0
        }
    }

    /// Check if parsing was mostly successful (>90% success rate)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > 90.0
    }
}

impl Default for ParseStats {
    fn default() -> Self {
        Self::new()
    }
}
