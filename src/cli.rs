//! Command-line argument definitions.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::{BlockSchema, DelimitedSchema, ParserConfig};
use crate::error::{CatalogError, Result};
use crate::export::ExportFormat;
use crate::models::CatalogField;

/// Parse ATNF pulsar catalogue exports and convert EPN pulse profiles
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pulsar-catalog",
    version,
    about = "Parse ATNF pulsar catalogue exports into typed records",
    long_about = "Reads ATNF pulsar catalogue text, either the comma separated web exports \
                  or the native keyword block format, into typed records. Reports per-column \
                  statistics, exports records to CSV or Parquet and rescales EPN pulse profiles."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse a catalogue and report statistics
    Summary(SummaryArgs),
    /// Parse a catalogue and write the records to CSV or Parquet
    Export(ExportArgs),
    /// Rescale EPN ascii profiles (.acn) into 0-255 comma separated profiles (.asc)
    Rescale(RescaleArgs),
}

/// Catalogue dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    /// Comma separated export, one pulsar per line
    Delimited,
    /// Native ATNF format, one pulsar per `@`-terminated block
    Block,
}

/// Column layout preset for delimited exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    /// #,NAME,Gl,Gb,P0,P1,F0,DM
    Short,
    /// Short layout plus BINARY,PB,A1,BINCOMP,DIST,DIST_DM,AGE,EDOT,PMTOT
    Extended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Parquet,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Parquet => ExportFormat::Parquet,
        }
    }
}

/// Options shared by every command that reads a catalogue
#[derive(Debug, Clone, ClapArgs)]
pub struct CatalogArgs {
    /// Catalogue file to read
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    /// Input dialect (never guessed from content)
    #[arg(short, long, value_enum)]
    pub dialect: DialectArg,

    /// Column layout preset for delimited input
    #[arg(long, value_enum, default_value = "short")]
    pub layout: LayoutArg,

    /// Bind a field to a zero based column, e.g. `DM=7` (delimited only)
    #[arg(long = "column", value_name = "FIELD=INDEX", value_parser = parse_column_binding)]
    pub columns: Vec<(CatalogField, usize)>,

    /// Reject entries that lack this field (repeatable)
    #[arg(long = "require", value_name = "FIELD")]
    pub required: Vec<CatalogField>,

    /// Number of rejection messages to keep
    #[arg(long, default_value_t = 100)]
    pub max_errors: usize,

    /// Skip galactic coordinate derivation for block input
    #[arg(long)]
    pub no_reconcile: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl CatalogArgs {
    /// Build the parser configuration described by the arguments
    pub fn parser_config(&self) -> Result<ParserConfig> {
        let config = match self.dialect {
            DialectArg::Delimited => {
                let mut schema = match self.layout {
                    LayoutArg::Short => DelimitedSchema::short_export(),
                    LayoutArg::Extended => DelimitedSchema::extended_export(),
                };
                for &(field, index) in &self.columns {
                    schema = schema.with_column(field, index);
                }
                for &field in &self.required {
                    schema = schema.with_required(field);
                }
                ParserConfig::delimited(schema)
            }
            DialectArg::Block => {
                if !self.columns.is_empty() {
                    return Err(CatalogError::configuration(
                        "--column only applies to delimited input",
                    ));
                }
                let mut schema = BlockSchema::atnf();
                if self.no_reconcile {
                    schema = schema.without_coordinate_reconciliation();
                }
                for &field in &self.required {
                    schema = schema.with_required(field);
                }
                ParserConfig::block(schema)
            }
        };

        Ok(config.with_max_reported_errors(self.max_errors))
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[derive(Debug, Clone, ClapArgs)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Also report Freedman-Diaconis histogram bin counts
    #[arg(long)]
    pub bins: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ExportArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Output format, taken from the file extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

impl ExportArgs {
    pub fn export_format(&self) -> ExportFormat {
        self.format
            .map(ExportFormat::from)
            .or_else(|| ExportFormat::from_path(&self.output))
            .unwrap_or(ExportFormat::Csv)
    }
}

#[derive(Debug, Clone, ClapArgs)]
pub struct RescaleArgs {
    /// Directory searched recursively for .acn profiles
    #[arg(value_name = "INPUT_DIR")]
    pub input: PathBuf,

    /// Directory the .asc profiles are written to (created if missing)
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    pub output: PathBuf,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl RescaleArgs {
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

impl Commands {
    pub fn log_level(&self) -> &'static str {
        match self {
            Commands::Summary(args) => args.catalog.log_level(),
            Commands::Export(args) => args.catalog.log_level(),
            Commands::Rescale(args) => args.log_level(),
        }
    }

    /// Path the command reads from
    pub fn input_path(&self) -> &Path {
        match self {
            Commands::Summary(args) => &args.catalog.catalog,
            Commands::Export(args) => &args.catalog.catalog,
            Commands::Rescale(args) => &args.input,
        }
    }
}

/// Parse `FIELD=INDEX` into a column binding
pub fn parse_column_binding(s: &str) -> std::result::Result<(CatalogField, usize), String> {
    let (field, index) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=INDEX, got '{}'", s))?;
    let field = field.parse::<CatalogField>()?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid column index '{}': {}", index, e))?;
    Ok((field, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogDialect;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pulsar-catalog").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_column_binding() {
        assert_eq!(
            parse_column_binding("dm=9"),
            Ok((CatalogField::DispersionMeasure, 9))
        );
        assert!(parse_column_binding("DM").is_err());
        assert!(parse_column_binding("DM=x").is_err());
        assert!(parse_column_binding("DMEPOCH=3").is_err());
    }

    #[test]
    fn test_summary_delimited_arguments() {
        let args = parse(&[
            "summary",
            "psrcat.csv",
            "--dialect",
            "delimited",
            "--layout",
            "extended",
            "--column",
            "DM=20",
            "--require",
            "P0",
            "--bins",
        ]);

        let Commands::Summary(summary) = args.command else {
            panic!("expected summary command");
        };
        assert!(summary.bins);
        assert!(!summary.json);

        let config = summary.catalog.parser_config().unwrap();
        let CatalogDialect::Delimited(schema) = config.dialect else {
            panic!("expected delimited dialect");
        };
        assert_eq!(schema.columns[&CatalogField::DispersionMeasure], 20);
        assert_eq!(schema.columns[&CatalogField::ProperMotion], 16);
        assert!(schema.required.contains(&CatalogField::Period));
    }

    #[test]
    fn test_block_arguments() {
        let args = parse(&["summary", "psrcat.db", "-d", "block", "--no-reconcile"]);
        let Commands::Summary(summary) = args.command else {
            panic!("expected summary command");
        };

        let config = summary.catalog.parser_config().unwrap();
        let CatalogDialect::Block(schema) = config.dialect else {
            panic!("expected block dialect");
        };
        assert!(!schema.reconcile_coordinates);
    }

    #[test]
    fn test_column_rejected_for_block() {
        let args = parse(&["summary", "psrcat.db", "-d", "block", "--column", "DM=3"]);
        let Commands::Summary(summary) = args.command else {
            panic!("expected summary command");
        };
        assert!(summary.catalog.parser_config().is_err());
    }

    #[test]
    fn test_dialect_is_required() {
        let result = Args::try_parse_from(["pulsar-catalog", "summary", "psrcat.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_export_format() {
        let args = parse(&["export", "psrcat.db", "-d", "block", "-o", "out.parquet"]);
        let Commands::Export(export) = args.command else {
            panic!("expected export command");
        };
        assert_eq!(export.export_format(), ExportFormat::Parquet);

        let args = parse(&["export", "psrcat.db", "-d", "block", "-o", "out.parquet", "-f", "csv"]);
        let Commands::Export(export) = args.command else {
            panic!("expected export command");
        };
        assert_eq!(export.export_format(), ExportFormat::Csv);
    }

    #[test]
    fn test_rescale_arguments() {
        let args = parse(&["rescale", "epn", "-o", "asc", "--no-progress", "-v"]);
        assert_eq!(args.command.log_level(), "debug");
        assert_eq!(args.command.input_path(), Path::new("epn"));
    }
}
