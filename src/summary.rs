//! Descriptive statistics over parsed records.
//!
//! Statistics only look at values that are present; a missing value is
//! never counted as zero. The results are diagnostic output and do not
//! influence parsing.

use serde::Serialize;

use crate::constants::FALLBACK_BIN_WIDTH;
use crate::models::{CatalogField, FieldKind, PulsarRecord};

/// Summary of one numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogColumnStats {
    pub field: CatalogField,

    /// Number of records with a value for this field
    pub count: usize,

    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,

    /// Present values equal to zero
    pub zero_count: usize,
}

impl CatalogColumnStats {
    pub fn from_values(field: CatalogField, values: &[f64]) -> Self {
        let count = values.len();
        let zero_count = values.iter().filter(|&&v| v == 0.0).count();

        if count == 0 {
            return Self {
                field,
                count,
                mean: None,
                min: None,
                max: None,
                zero_count,
            };
        }

        let sum: f64 = values.iter().sum();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            field,
            count,
            mean: Some(sum / count as f64),
            min: Some(min),
            max: Some(max),
            zero_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Per-column statistics and counts for a set of records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub record_count: usize,

    /// One entry per numeric field, in field order
    pub columns: Vec<CatalogColumnStats>,

    /// Records flagged as members of a binary system
    pub binary_count: usize,
}

impl CatalogSummary {
    pub fn from_records(records: &[PulsarRecord]) -> Self {
        let columns = numeric_fields()
            .map(|field| CatalogColumnStats::from_values(field, &column_values(records, field)))
            .collect();

        Self {
            record_count: records.len(),
            columns,
            binary_count: records.iter().filter(|r| r.binary_flag()).count(),
        }
    }

    pub fn column(&self, field: CatalogField) -> Option<&CatalogColumnStats> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Columns with at least one value
    pub fn populated_columns(&self) -> impl Iterator<Item = &CatalogColumnStats> {
        self.columns.iter().filter(|c| !c.is_empty())
    }
}

/// Fields that carry numbers, in declaration order
pub fn numeric_fields() -> impl Iterator<Item = CatalogField> {
    CatalogField::ALL
        .into_iter()
        .filter(|field| field.kind() == FieldKind::Number)
}

/// Present values of `field`, in record order
pub fn column_values(records: &[PulsarRecord], field: CatalogField) -> Vec<f64> {
    records.iter().filter_map(|r| r.number(field)).collect()
}

/// Histogram bin count by the Freedman-Diaconis rule
///
/// Bin width is `2 * IQR / n^(1/3)` with linearly interpolated quartiles.
/// A collapsed interquartile range falls back to a fixed width. Returns
/// `None` for an empty sample and at least one bin otherwise.
pub fn freedman_diaconis_bins(values: &[f64]) -> Option<usize> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let iqr = percentile(&sorted, 75.0) - percentile(&sorted, 25.0);
    let mut bin_width = 2.0 * iqr / n.cbrt();
    if bin_width <= 0.0 {
        bin_width = FALLBACK_BIN_WIDTH;
    }

    let range = sorted[sorted.len() - 1] - sorted[0];
    let bins = (range / bin_width).ceil() as usize;
    Some(bins.max(1))
}

/// Percentile of sorted data with linear interpolation between ranks
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
