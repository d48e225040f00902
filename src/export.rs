//! Export of parsed records through polars.
//!
//! Records become a [`DataFrame`] with one column per record field. Missing
//! values are written as nulls.

use polars::prelude::{
    Column, CsvWriter, DataFrame, NamedFrom, ParquetCompression, ParquetWriter, SerWriter, Series,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::models::{CatalogField, PulsarRecord};
use crate::summary::numeric_fields;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Parquet,
}

impl ExportFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("csv") {
            Some(ExportFormat::Csv)
        } else if ext.eq_ignore_ascii_case("parquet") {
            Some(ExportFormat::Parquet)
        } else {
            None
        }
    }
}

fn column_name(field: CatalogField) -> String {
    field.label().to_lowercase()
}

fn text_column(name: &str, values: Vec<Option<&str>>) -> Column {
    Series::new(name.into(), values).into()
}

/// Build a data frame with one row per record
pub fn records_to_dataframe(records: &[PulsarRecord]) -> Result<DataFrame> {
    let mut columns: Vec<Column> = vec![
        text_column(
            &column_name(CatalogField::Name),
            records.iter().map(|r| r.name()).collect(),
        ),
        text_column(
            &column_name(CatalogField::RightAscension),
            records.iter().map(|r| r.right_ascension()).collect(),
        ),
        text_column(
            &column_name(CatalogField::Declination),
            records.iter().map(|r| r.declination()).collect(),
        ),
        text_column(
            "binary_type",
            records.iter().map(|r| r.binary_type()).collect(),
        ),
        Series::new(
            "binary_flag".into(),
            records.iter().map(|r| r.binary_flag()).collect::<Vec<bool>>(),
        )
        .into(),
    ];

    for field in numeric_fields() {
        let values: Vec<Option<f64>> = records.iter().map(|r| r.number(field)).collect();
        columns.push(Series::new(column_name(field).into(), values).into());
    }

    Ok(DataFrame::new(columns)?)
}

/// Write records to `path` in the given format
pub fn write_records(records: &[PulsarRecord], path: &Path, format: ExportFormat) -> Result<usize> {
    let mut df = records_to_dataframe(records)?;
    debug!("Built export frame with shape {:?}", df.shape());

    let mut file = File::create(path)?;
    let export_error = |e: polars::error::PolarsError| CatalogError::Export {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    match format {
        ExportFormat::Csv => {
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut df)
                .map_err(export_error)?;
        }
        ExportFormat::Parquet => {
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map_err(export_error)?;
        }
    }

    info!(
        "Exported {} records as {:?} to {}",
        df.height(),
        format,
        path.display()
    );
    Ok(df.height())
}
