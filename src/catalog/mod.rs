//! ATNF catalogue record parser
//!
//! Turns catalogue text into [`PulsarRecord`](crate::models::PulsarRecord)s.
//! Two input dialects are supported and the caller always names the one in
//! use:
//! - [`delimited`] - comma separated exports, one pulsar per line, columns
//!   picked through a configurable schema
//! - [`block`] - the native keyword/value format, one pulsar per
//!   `@`-terminated block, with coordinate reconciliation
//!
//! ## Usage
//!
//! ```rust
//! use pulsar_catalog::catalog::CatalogRecordParser;
//! use pulsar_catalog::config::{BlockSchema, ParserConfig};
//!
//! # fn example() -> pulsar_catalog::Result<()> {
//! let parser = CatalogRecordParser::new(ParserConfig::block(BlockSchema::atnf()))?;
//! let result = parser.parse_str("PSRJ J0006+1834\nP0 0.5\n@----\n")?;
//!
//! assert_eq!(result.records[0].frequency(), Some(2.0));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod block;
pub mod delimited;
pub mod parser;
pub mod stats;

#[cfg(test)]
mod tests;

pub use parser::CatalogRecordParser;
pub use stats::{ParseResult, ParseStats};
