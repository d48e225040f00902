//! Pulsar Catalog Library
//!
//! A Rust library for reading ATNF pulsar catalogue text into typed records.
//!
//! This library provides tools for:
//! - Parsing comma separated catalogue exports with configurable column layouts
//! - Parsing the native `@`-terminated keyword block format
//! - Reconciling equatorial and ecliptic positions into galactic coordinates
//! - Summarising numeric columns and preparing sky projections
//! - Rescaling EPN pulse profiles into the 0-255 range
//! - Exporting records to CSV and Parquet through polars
//!
//! A missing catalogue value is always `None`, never zero. Problems inside a
//! single line or block are counted and skipped; only an unreadable source
//! fails a parse.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod error;
pub mod export;
pub mod models;
pub mod profile;
pub mod projection;
pub mod summary;

// Re-export commonly used types
pub use catalog::{CatalogRecordParser, ParseResult, ParseStats};
pub use config::{BlockSchema, CatalogDialect, DelimitedSchema, ParserConfig};
pub use error::{CatalogError, RecordError, Result};
pub use models::{CatalogField, PulsarRecord};
