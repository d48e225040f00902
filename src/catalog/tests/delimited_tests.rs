//! Tests for the delimited export dialect

use super::*;
use crate::config::{DelimitedSchema, ParserConfig};
use crate::models::CatalogField;
use approx::assert_abs_diff_eq;

#[test]
fn test_header_skipped_and_rows_parsed() {
    let result = short_parser().parse_str(&short_export_csv()).unwrap();

    assert_eq!(result.records.len(), 5);
    assert_eq!(result.stats.total_chunks, 6);
    assert_eq!(result.stats.chunks_skipped, 1);
    assert_eq!(result.stats.records_rejected, 0);

    let names: Vec<&str> = result.records.iter().map(|r| r.display_name()).collect();
    assert_eq!(
        names,
        vec!["J0006+1834", "J0007+7303", "B0011+47", "J0023+0923", "B0021-72C"]
    );
}

#[test]
fn test_first_row_values() {
    let content = "#,NAME,Gl(deg),Gb(deg),P0(s),P1,F0(Hz),DM\n\
                   1,J0006+1834,108.172,-42.985,0.693748,2.10e-15,1.441446,12.00";
    let result = short_parser().parse_str(content).unwrap();

    assert_eq!(result.records.len(), 1);
    let record = &result.records[0];
    assert_eq!(record.name(), Some("J0006+1834"));
    assert_abs_diff_eq!(
        record.galactic_longitude_rad().unwrap(),
        108.172_f64.to_radians(),
        epsilon = 1e-12
    );
    assert_eq!(record.galactic_latitude_deg(), Some(-42.985));
    assert_eq!(record.period_derivative(), Some(2.10e-15));
    assert_eq!(record.dispersion_measure(), Some(12.0));
}

#[test]
fn test_missing_token_is_absent_not_zero() {
    let result = short_parser().parse_str(&short_export_csv()).unwrap();

    let j0007 = &result.records[1];
    assert_eq!(j0007.dispersion_measure(), None);

    let j0023 = &result.records[3];
    assert_eq!(j0023.period_derivative(), None);
    assert_eq!(j0023.dispersion_measure(), Some(14.30));
}

#[test]
fn test_period_and_frequency_kept_when_both_present() {
    let result = short_parser().parse_str(&short_export_csv()).unwrap();
    let expected = [
        (0.693748, 1.441446),
        (0.315873, 3.165827),
        (1.240699, 0.805997),
        (0.003050, 327.868852),
        (0.005757, 173.708219),
    ];

    for (record, (p0, f0)) in result.records.iter().zip(expected) {
        assert_eq!(record.period(), Some(p0));
        assert_eq!(record.frequency(), Some(f0));
    }
}

#[test]
fn test_reciprocal_derived_for_single_value() {
    let content = "1,J0001+0001,10.0,1.0,0.25,*,*,5.0\n2,J0002+0002,20.0,2.0,*,*,8.0,6.0";
    let result = short_parser().parse_str(content).unwrap();

    assert_eq!(result.records[0].frequency(), Some(1.0 / 0.25));
    assert_eq!(result.records[1].period(), Some(1.0 / 8.0));
}

#[test]
fn test_invalid_number_rejects_line_and_continues() {
    let content = "1,J0001+0001,abc,1.0,0.25,*,*,5.0\n2,J0002+0002,20.0,2.0,0.5,*,*,6.0";
    let result = short_parser().parse_str(content).unwrap();

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].name(), Some("J0002+0002"));
    assert_eq!(result.stats.records_rejected, 1);
    assert_eq!(result.stats.errors.len(), 1);
    assert!(result.stats.errors[0].starts_with("line 1"));
    assert!(result.stats.errors[0].contains("GL"));
}

#[test]
fn test_missing_required_name_rejects_line() {
    let content = "1,*,10.0,1.0,0.25,*,*,5.0";
    let result = short_parser().parse_str(content).unwrap();

    assert!(result.records.is_empty());
    assert_eq!(result.stats.records_rejected, 1);
}

#[test]
fn test_short_line_leaves_optional_fields_absent() {
    let result = short_parser().parse_str("9,J0009+0009,10.5").unwrap();

    assert_eq!(result.records.len(), 1);
    let record = &result.records[0];
    assert_eq!(record.galactic_longitude_deg(), Some(10.5));
    assert_eq!(record.galactic_latitude_deg(), None);
    assert_eq!(record.dispersion_measure(), None);
}

#[test]
fn test_whitespace_and_blank_lines() {
    let content = "#,NAME,Gl(deg),Gb(deg),P0(s),P1,F0(Hz),DM\r\n\r\n 1 , J0006+1834 , 108.172 , -42.985 , 0.693748 , * , * , 12.00 \r\n   \r\n";
    let result = short_parser().parse_str(content).unwrap();

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.stats.records_rejected, 0);
    assert_eq!(result.records[0].name(), Some("J0006+1834"));
    assert_eq!(result.records[0].dispersion_measure(), Some(12.0));
}

#[test]
fn test_extended_layout() {
    let result = extended_parser().parse_str(&extended_export_csv()).unwrap();
    assert_eq!(result.records.len(), 3);

    let isolated = &result.records[0];
    assert!(!isolated.binary_flag());
    assert_eq!(isolated.binary_period_days(), None);
    assert_eq!(isolated.distance_kpc(), Some(0.82));
    assert_eq!(isolated.characteristic_age_yr(), Some(5.24e6));
    assert_eq!(isolated.proper_motion_total(), None);

    let binary = &result.records[1];
    assert!(binary.binary_flag());
    assert_eq!(binary.binary_type(), Some("ELL1"));
    assert_eq!(binary.binary_period_days(), Some(0.139));
    assert_eq!(binary.semi_major_axis(), Some(0.0348));
    assert_eq!(binary.spin_down_luminosity(), Some(1.46e34));
    // A catalogued zero is a value, not a gap
    assert_eq!(binary.proper_motion_total(), Some(0.0));
}

#[test]
fn test_custom_layout() {
    let schema = DelimitedSchema {
        delimiter: b';',
        columns: [
            (CatalogField::Name, 0),
            (CatalogField::DispersionMeasure, 1),
            (CatalogField::Period, 2),
        ]
        .into_iter()
        .collect(),
        required: vec![CatalogField::Name, CatalogField::DispersionMeasure],
    };
    let parser = CatalogRecordParser::new(ParserConfig::delimited(schema)).unwrap();

    let result = parser.parse_str("J1000+1000;50.5;0.1\nJ2000+2000;*;0.2").unwrap();

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].dispersion_measure(), Some(50.5));
    assert_eq!(result.records[0].frequency(), Some(1.0 / 0.1));
    assert_eq!(result.stats.records_rejected, 1);
}

#[test]
fn test_stray_quote_stays_on_its_line() {
    let content = "1,\"J0001+0001,10.0,1.0,0.5,*,*,3.0\n\
                   2,J0002+0002,20.0,2.0,0.6,*,*,4.0\n\
                   3,J0003+0003,30.0,3.0,0.7,*,*,5.0\n";
    let result = short_parser().parse_str(content).unwrap();

    assert_eq!(result.records.len(), 3);
    assert_eq!(result.stats.records_rejected, 0);
    assert_eq!(result.records[0].name(), Some("\"J0001+0001"));
    assert_eq!(result.records[1].name(), Some("J0002+0002"));
    assert_eq!(result.records[2].name(), Some("J0003+0003"));
    assert_eq!(result.records[2].dispersion_measure(), Some(5.0));
}
