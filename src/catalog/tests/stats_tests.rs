//! Tests for parse statistics bookkeeping

use super::super::stats::ParseStats;
use crate::error::RecordError;
use crate::models::CatalogField;

#[test]
fn test_parse_stats_calculation() {
    let stats = ParseStats {
        total_chunks: 101,
        records_parsed: 95,
        records_rejected: 5,
        chunks_skipped: 1,
        coordinate_fallbacks: 0,
        errors: vec!["line 3: bad".to_string()],
    };

    // Skipped headers do not count against the rate
    assert_eq!(stats.success_rate(), 95.0);
    assert!(stats.is_successful());

    let poor_stats = ParseStats {
        total_chunks: 100,
        records_parsed: 80,
        records_rejected: 20,
        ..ParseStats::new()
    };

    assert_eq!(poor_stats.success_rate(), 80.0);
    assert!(!poor_stats.is_successful());
}

#[test]
fn test_parse_stats_empty() {
    let empty_stats = ParseStats::new();

    assert_eq!(empty_stats.total_chunks, 0);
    assert_eq!(empty_stats.records_parsed, 0);
    assert!(empty_stats.errors.is_empty());
    assert_eq!(empty_stats.success_rate(), 0.0);
    assert!(!empty_stats.is_successful());
}

#[test]
fn test_rejection_messages_are_capped() {
    let mut stats = ParseStats::new();
    let error = RecordError::MissingRequired {
        field: CatalogField::Name,
    };

    for line in 0..5 {
        stats.record_rejected(&format!("line {}", line), &error, 2);
    }

    assert_eq!(stats.records_rejected, 5);
    assert_eq!(stats.total_chunks, 5);
    assert_eq!(stats.errors.len(), 2);
    assert_eq!(stats.errors[0], "line 0: required field NAME is missing");
}
