//! Command implementations for the pulsar-catalog CLI
//!
//! Each runner parses its input through the library, prints a coloured
//! report (or JSON) to stdout and leaves logging on stderr.

use anyhow::{Context, Result};
use colored::*;
use indicatif::HumanDuration;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogRecordParser, ParseResult, ParseStats};
use crate::cli::{Args, CatalogArgs, Commands, DialectArg, ExportArgs, RescaleArgs, SummaryArgs};
use crate::export::write_records;
use crate::profile::convert_epn_directory;
use crate::projection::partition_sky_positions;
use crate::summary::{CatalogSummary, column_values, freedman_diaconis_bins, numeric_fields};

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the level chosen on the command line.
pub fn setup_logging(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pulsar_catalog={}", log_level)));

    // A second initialisation (e.g. in tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Run the selected command
pub fn run(args: Args) -> Result<()> {
    setup_logging(args.command.log_level());
    debug!("Input path: {}", args.command.input_path().display());

    match args.command {
        Commands::Summary(args) => run_summary(&args),
        Commands::Export(args) => run_export(&args),
        Commands::Rescale(args) => run_rescale(&args),
    }
}

fn parse_catalog(args: &CatalogArgs) -> Result<ParseResult> {
    let config = args
        .parser_config()
        .context("Invalid catalogue options")?;
    let parser = CatalogRecordParser::new(config).context("Invalid parser configuration")?;

    let result = parser
        .parse_file(&args.catalog)
        .with_context(|| format!("Failed to parse {}", args.catalog.display()))?;

    if !result.stats.is_successful() && result.stats.records_rejected > 0 {
        warn!(
            "Only {:.1}% of catalogue entries were accepted",
            result.stats.success_rate()
        );
    }

    Ok(result)
}

/// Counts of the sky projection partition
#[derive(Debug, Serialize)]
struct SkyCounts {
    normal: usize,
    millisecond: usize,
    excluded: usize,
}

/// Everything `summary` reports
#[derive(Debug, Serialize)]
struct SummaryReport {
    source: String,
    dialect: &'static str,
    parse: ParseStats,
    summary: CatalogSummary,
    sky: SkyCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    histogram_bins: Option<BTreeMap<String, usize>>,
}

fn run_summary(args: &SummaryArgs) -> Result<()> {
    let start = Instant::now();
    let result = parse_catalog(&args.catalog)?;

    let partition = partition_sky_positions(&result.records);
    let histogram_bins: Option<BTreeMap<String, usize>> = args.bins.then(|| {
        numeric_fields()
            .filter_map(|field| {
                freedman_diaconis_bins(&column_values(&result.records, field))
                    .map(|bins| (field.label().to_string(), bins))
            })
            .collect()
    });

    let report = SummaryReport {
        source: args.catalog.catalog.display().to_string(),
        dialect: match args.catalog.dialect {
            DialectArg::Delimited => "delimited",
            DialectArg::Block => "block",
        },
        summary: CatalogSummary::from_records(&result.records),
        sky: SkyCounts {
            normal: partition.normal.len(),
            millisecond: partition.millisecond.len(),
            excluded: partition.excluded,
        },
        parse: result.stats,
        histogram_bins,
    };

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{}", json);
    } else {
        print_summary(&report);
        println!(
            "  {} {}",
            "Time elapsed:".bright_cyan(),
            HumanDuration(start.elapsed()).to_string().bright_white()
        );
    }

    Ok(())
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 && (v.abs() < 1e-3 || v.abs() >= 1e6) => format!("{:.4e}", v),
        Some(v) => format!("{:.4}", v),
        None => "-".to_string(),
    }
}

fn print_summary(report: &SummaryReport) {
    let parse = &report.parse;

    println!("\n{}", "Catalogue Summary".bright_green().bold());
    println!(
        "  {} {} ({})",
        "Source:".bright_cyan(),
        report.source.bright_white(),
        report.dialect
    );
    println!(
        "  {} {}",
        "Records parsed:".bright_cyan(),
        parse.records_parsed.to_string().bright_white().bold()
    );
    if parse.records_rejected > 0 {
        println!(
            "  {} {}",
            "Records rejected:".bright_red(),
            parse.records_rejected.to_string().bright_red().bold()
        );
        for message in &parse.errors {
            println!("    {}", message.red());
        }
    }
    println!(
        "  {} {}",
        "Chunks skipped:".bright_cyan(),
        parse.chunks_skipped.to_string().bright_white()
    );
    if parse.coordinate_fallbacks > 0 {
        println!(
            "  {} {}",
            "Positions left unreconciled:".bright_yellow(),
            parse.coordinate_fallbacks.to_string().bright_yellow()
        );
    }
    println!(
        "  {} {:.1}%",
        "Success rate:".bright_cyan(),
        parse.success_rate()
    );

    println!("\n{}", "Columns".bright_green().bold());
    println!(
        "  {:<8} {:>6} {:>14} {:>14} {:>14} {:>6}",
        "field", "count", "mean", "min", "max", "zeros"
    );
    for column in report.summary.populated_columns() {
        println!(
            "  {:<8} {:>6} {:>14} {:>14} {:>14} {:>6}",
            column.field.label().bright_white(),
            column.count,
            format_value(column.mean),
            format_value(column.min),
            format_value(column.max),
            column.zero_count
        );
    }

    println!("\n{}", "Population".bright_green().bold());
    println!(
        "  {} {}",
        "Binary systems:".bright_cyan(),
        report.summary.binary_count.to_string().bright_white()
    );
    println!(
        "  {} {} normal, {} millisecond, {} excluded",
        "Sky positions:".bright_cyan(),
        report.sky.normal.to_string().bright_white(),
        report.sky.millisecond.to_string().bright_white(),
        report.sky.excluded
    );

    if let Some(bins) = &report.histogram_bins {
        println!("\n{}", "Histogram bins (Freedman-Diaconis)".bright_green().bold());
        for (label, count) in bins {
            println!("  {:<8} {}", label.bright_white(), count);
        }
    }
}

fn run_export(args: &ExportArgs) -> Result<()> {
    let start = Instant::now();
    let result = parse_catalog(&args.catalog)?;
    let format = args.export_format();

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let written = write_records(&result.records, &args.output, format)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!("Export finished in {}", HumanDuration(start.elapsed()));
    println!(
        "{} {} records to {}",
        "Exported".bright_green().bold(),
        written.to_string().bright_white().bold(),
        args.output.display()
    );
    if result.stats.records_rejected > 0 {
        println!(
            "  {} {}",
            "Records rejected:".bright_red(),
            result.stats.records_rejected.to_string().bright_red()
        );
    }

    Ok(())
}

fn run_rescale(args: &RescaleArgs) -> Result<()> {
    let start = Instant::now();
    let stats = convert_epn_directory(&args.input, &args.output, !args.no_progress)
        .with_context(|| format!("Failed to convert profiles in {}", args.input.display()))?;

    println!("\n{}", "Profile Conversion".bright_green().bold());
    println!(
        "  {} {}",
        "Profiles found:".bright_cyan(),
        stats.files_found.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Profiles converted:".bright_cyan(),
        stats.files_converted.to_string().bright_white().bold()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Profiles failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
        for message in &stats.errors {
            println!("    {}", message.red());
        }
    }
    println!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(start.elapsed()).to_string().bright_white()
    );

    if stats.files_found == 0 {
        warn!("No .acn profiles found below {}", args.input.display());
    }

    Ok(())
}
