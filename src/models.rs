//! Core data structures for parsed catalogue entries.
//!
//! A [`PulsarRecord`] is assembled from exactly one input chunk (one
//! delimited line or one `@`-terminated block) through a [`RecordBuilder`]
//! and is read-only afterwards. Every value the catalogue leaves out is
//! `None`; a real zero stays `Some(0.0)`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{MISSING_VALUE, MSP_MAX_PERIOD_DERIVATIVE, MSP_MAX_PERIOD_MS, UNKNOWN_NAME};
use crate::coordinates::normalize_longitude_deg;
use crate::error::RecordError;

/// Semantic catalogue fields a column or keyword can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CatalogField {
    Name,
    RightAscension,
    Declination,
    EclipticLongitude,
    EclipticLatitude,
    GalacticLongitude,
    GalacticLatitude,
    Period,
    PeriodDerivative,
    Frequency,
    DispersionMeasure,
    PulseWidth10,
    PulseWidth50,
    BinaryType,
    BinaryPeriod,
    SemiMajorAxis,
    Distance,
    DistanceDm,
    CharacteristicAge,
    SpinDownLuminosity,
    ProperMotion,
}

/// How the raw text of a field is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

impl CatalogField {
    pub const ALL: [CatalogField; 21] = [
        CatalogField::Name,
        CatalogField::RightAscension,
        CatalogField::Declination,
        CatalogField::EclipticLongitude,
        CatalogField::EclipticLatitude,
        CatalogField::GalacticLongitude,
        CatalogField::GalacticLatitude,
        CatalogField::Period,
        CatalogField::PeriodDerivative,
        CatalogField::Frequency,
        CatalogField::DispersionMeasure,
        CatalogField::PulseWidth10,
        CatalogField::PulseWidth50,
        CatalogField::BinaryType,
        CatalogField::BinaryPeriod,
        CatalogField::SemiMajorAxis,
        CatalogField::Distance,
        CatalogField::DistanceDm,
        CatalogField::CharacteristicAge,
        CatalogField::SpinDownLuminosity,
        CatalogField::ProperMotion,
    ];

    /// Catalogue label of the field, as used in ATNF headers and keywords
    pub fn label(&self) -> &'static str {
        match self {
            CatalogField::Name => "NAME",
            CatalogField::RightAscension => "RAJ",
            CatalogField::Declination => "DECJ",
            CatalogField::EclipticLongitude => "ELONG",
            CatalogField::EclipticLatitude => "ELAT",
            CatalogField::GalacticLongitude => "GL",
            CatalogField::GalacticLatitude => "GB",
            CatalogField::Period => "P0",
            CatalogField::PeriodDerivative => "P1",
            CatalogField::Frequency => "F0",
            CatalogField::DispersionMeasure => "DM",
            CatalogField::PulseWidth10 => "W10",
            CatalogField::PulseWidth50 => "W50",
            CatalogField::BinaryType => "BINARY",
            CatalogField::BinaryPeriod => "PB",
            CatalogField::SemiMajorAxis => "A1",
            CatalogField::Distance => "DIST",
            CatalogField::DistanceDm => "DIST_DM",
            CatalogField::CharacteristicAge => "AGE",
            CatalogField::SpinDownLuminosity => "EDOT",
            CatalogField::ProperMotion => "PMTOT",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            CatalogField::Name
            | CatalogField::RightAscension
            | CatalogField::Declination
            | CatalogField::EclipticLongitude
            | CatalogField::EclipticLatitude
            | CatalogField::BinaryType => FieldKind::Text,
            _ => FieldKind::Number,
        }
    }
}

impl fmt::Display for CatalogField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CatalogField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CatalogField::ALL
            .iter()
            .copied()
            .find(|field| field.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown catalogue field '{}'", wanted))
    }
}

/// One parsed pulsar entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PulsarRecord {
    name: Option<String>,
    right_ascension: Option<String>,
    declination: Option<String>,
    galactic_longitude_deg: Option<f64>,
    galactic_latitude_deg: Option<f64>,
    period: Option<f64>,
    period_derivative: Option<f64>,
    frequency: Option<f64>,
    dispersion_measure: Option<f64>,
    pulse_width_10: Option<f64>,
    pulse_width_50: Option<f64>,
    binary_flag: bool,
    binary_type: Option<String>,
    binary_period_days: Option<f64>,
    semi_major_axis: Option<f64>,
    distance_kpc: Option<f64>,
    distance_dm_kpc: Option<f64>,
    characteristic_age_yr: Option<f64>,
    spin_down_luminosity: Option<f64>,
    proper_motion_total: Option<f64>,
}

impl PulsarRecord {
    pub fn builder() -> RecordBuilder {
        RecordBuilder::new()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Catalogue identifier, or `"Unknown"` when the source had none
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_NAME)
    }

    pub fn right_ascension(&self) -> Option<&str> {
        self.right_ascension.as_deref()
    }

    pub fn declination(&self) -> Option<&str> {
        self.declination.as_deref()
    }

    /// Galactic longitude in degrees as given, [0, 360)
    pub fn galactic_longitude_deg(&self) -> Option<f64> {
        self.galactic_longitude_deg
    }

    pub fn galactic_latitude_deg(&self) -> Option<f64> {
        self.galactic_latitude_deg
    }

    /// Galactic longitude folded into (-180, 180] and converted to radians
    pub fn galactic_longitude_rad(&self) -> Option<f64> {
        self.galactic_longitude_deg
            .map(|l| normalize_longitude_deg(l).to_radians())
    }

    pub fn galactic_latitude_rad(&self) -> Option<f64> {
        self.galactic_latitude_deg.map(f64::to_radians)
    }

    /// Barycentric period in seconds
    pub fn period(&self) -> Option<f64> {
        self.period
    }

    pub fn period_derivative(&self) -> Option<f64> {
        self.period_derivative
    }

    /// Barycentric rotation frequency in Hz
    pub fn frequency(&self) -> Option<f64> {
        self.frequency
    }

    pub fn dispersion_measure(&self) -> Option<f64> {
        self.dispersion_measure
    }

    pub fn pulse_width_10(&self) -> Option<f64> {
        self.pulse_width_10
    }

    pub fn pulse_width_50(&self) -> Option<f64> {
        self.pulse_width_50
    }

    pub fn binary_flag(&self) -> bool {
        self.binary_flag
    }

    pub fn binary_type(&self) -> Option<&str> {
        self.binary_type.as_deref()
    }

    pub fn binary_period_days(&self) -> Option<f64> {
        self.binary_period_days
    }

    pub fn semi_major_axis(&self) -> Option<f64> {
        self.semi_major_axis
    }

    pub fn distance_kpc(&self) -> Option<f64> {
        self.distance_kpc
    }

    pub fn distance_dm_kpc(&self) -> Option<f64> {
        self.distance_dm_kpc
    }

    pub fn characteristic_age_yr(&self) -> Option<f64> {
        self.characteristic_age_yr
    }

    pub fn spin_down_luminosity(&self) -> Option<f64> {
        self.spin_down_luminosity
    }

    pub fn proper_motion_total(&self) -> Option<f64> {
        self.proper_motion_total
    }

    /// Value of a numeric field, `None` for text fields and missing values
    pub fn number(&self, field: CatalogField) -> Option<f64> {
        match field {
            CatalogField::GalacticLongitude => self.galactic_longitude_deg,
            CatalogField::GalacticLatitude => self.galactic_latitude_deg,
            CatalogField::Period => self.period,
            CatalogField::PeriodDerivative => self.period_derivative,
            CatalogField::Frequency => self.frequency,
            CatalogField::DispersionMeasure => self.dispersion_measure,
            CatalogField::PulseWidth10 => self.pulse_width_10,
            CatalogField::PulseWidth50 => self.pulse_width_50,
            CatalogField::BinaryPeriod => self.binary_period_days,
            CatalogField::SemiMajorAxis => self.semi_major_axis,
            CatalogField::Distance => self.distance_kpc,
            CatalogField::DistanceDm => self.distance_dm_kpc,
            CatalogField::CharacteristicAge => self.characteristic_age_yr,
            CatalogField::SpinDownLuminosity => self.spin_down_luminosity,
            CatalogField::ProperMotion => self.proper_motion_total,
            CatalogField::Name
            | CatalogField::RightAscension
            | CatalogField::Declination
            | CatalogField::EclipticLongitude
            | CatalogField::EclipticLatitude
            | CatalogField::BinaryType => None,
        }
    }

    /// Short period and small, non-zero spin-down; false when either value is
    /// unknown
    pub fn is_millisecond_pulsar(&self) -> bool {
        match (self.period, self.period_derivative) {
            (Some(p0), Some(p1)) => {
                p0 * 1000.0 < MSP_MAX_PERIOD_MS && p1 != 0.0 && p1 < MSP_MAX_PERIOD_DERIVATIVE
            }
            _ => false,
        }
    }
}

/// Accumulates the field values of one input chunk
///
/// Values are fed as raw text with [`RecordBuilder::set`]; the sentinel `*`
/// leaves a field absent. [`RecordBuilder::finish`] applies the
/// period/frequency reciprocal rule and produces the immutable record.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    record: PulsarRecord,
    ecliptic_longitude: Option<String>,
    ecliptic_latitude: Option<String>,
    fields_set: usize,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields that received a non-missing value
    pub fn fields_set(&self) -> usize {
        self.fields_set
    }

    pub fn is_empty(&self) -> bool {
        self.fields_set == 0
    }

    /// Store the raw text for `field`
    ///
    /// Numbers must parse as finite floats, otherwise the whole chunk is
    /// invalid. A later value for the same field replaces an earlier one.
    pub fn set(&mut self, field: CatalogField, raw: &str) -> Result<(), RecordError> {
        let value = raw.trim();
        if value.is_empty() || value == MISSING_VALUE {
            return Ok(());
        }

        match field.kind() {
            FieldKind::Text => self.set_text(field, value.to_string()),
            FieldKind::Number => {
                let number = value
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| RecordError::InvalidNumber {
                        field,
                        value: value.to_string(),
                    })?;
                self.set_number(field, number);
            }
        }

        self.fields_set += 1;
        Ok(())
    }

    fn set_text(&mut self, field: CatalogField, value: String) {
        let r = &mut self.record;
        match field {
            CatalogField::Name => r.name = Some(value),
            CatalogField::RightAscension => r.right_ascension = Some(value),
            CatalogField::Declination => r.declination = Some(value),
            CatalogField::EclipticLongitude => self.ecliptic_longitude = Some(value),
            CatalogField::EclipticLatitude => self.ecliptic_latitude = Some(value),
            CatalogField::BinaryType => {
                r.binary_flag = true;
                r.binary_type = Some(value);
            }
            _ => {}
        }
    }

    fn set_number(&mut self, field: CatalogField, value: f64) {
        let slot = match field {
            CatalogField::GalacticLongitude => &mut self.record.galactic_longitude_deg,
            CatalogField::GalacticLatitude => &mut self.record.galactic_latitude_deg,
            CatalogField::Period => &mut self.record.period,
            CatalogField::PeriodDerivative => &mut self.record.period_derivative,
            CatalogField::Frequency => &mut self.record.frequency,
            CatalogField::DispersionMeasure => &mut self.record.dispersion_measure,
            CatalogField::PulseWidth10 => &mut self.record.pulse_width_10,
            CatalogField::PulseWidth50 => &mut self.record.pulse_width_50,
            CatalogField::BinaryPeriod => &mut self.record.binary_period_days,
            CatalogField::SemiMajorAxis => &mut self.record.semi_major_axis,
            CatalogField::Distance => &mut self.record.distance_kpc,
            CatalogField::DistanceDm => &mut self.record.distance_dm_kpc,
            CatalogField::CharacteristicAge => &mut self.record.characteristic_age_yr,
            CatalogField::SpinDownLuminosity => &mut self.record.spin_down_luminosity,
            CatalogField::ProperMotion => &mut self.record.proper_motion_total,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Whether a value has been stored for `field`
    pub fn has(&self, field: CatalogField) -> bool {
        let r = &self.record;
        match field {
            CatalogField::Name => r.name.is_some(),
            CatalogField::RightAscension => r.right_ascension.is_some(),
            CatalogField::Declination => r.declination.is_some(),
            CatalogField::EclipticLongitude => self.ecliptic_longitude.is_some(),
            CatalogField::EclipticLatitude => self.ecliptic_latitude.is_some(),
            CatalogField::GalacticLongitude => r.galactic_longitude_deg.is_some(),
            CatalogField::GalacticLatitude => r.galactic_latitude_deg.is_some(),
            CatalogField::Period => r.period.is_some(),
            CatalogField::PeriodDerivative => r.period_derivative.is_some(),
            CatalogField::Frequency => r.frequency.is_some(),
            CatalogField::DispersionMeasure => r.dispersion_measure.is_some(),
            CatalogField::PulseWidth10 => r.pulse_width_10.is_some(),
            CatalogField::PulseWidth50 => r.pulse_width_50.is_some(),
            CatalogField::BinaryType => r.binary_type.is_some(),
            CatalogField::BinaryPeriod => r.binary_period_days.is_some(),
            CatalogField::SemiMajorAxis => r.semi_major_axis.is_some(),
            CatalogField::Distance => r.distance_kpc.is_some(),
            CatalogField::DistanceDm => r.distance_dm_kpc.is_some(),
            CatalogField::CharacteristicAge => r.characteristic_age_yr.is_some(),
            CatalogField::SpinDownLuminosity => r.spin_down_luminosity.is_some(),
            CatalogField::ProperMotion => r.proper_motion_total.is_some(),
        }
    }

    /// Raw equatorial and ecliptic strings collected so far
    pub fn position_inputs(&self) -> (Option<&str>, Option<&str>, Option<&str>, Option<&str>) {
        (
            self.record.right_ascension.as_deref(),
            self.record.declination.as_deref(),
            self.ecliptic_longitude.as_deref(),
            self.ecliptic_latitude.as_deref(),
        )
    }

    /// Store a derived equatorial position and galactic coordinates
    pub fn set_derived_position(
        &mut self,
        right_ascension: String,
        declination: String,
        galactic_longitude_deg: f64,
        galactic_latitude_deg: f64,
    ) {
        self.record.right_ascension = Some(right_ascension);
        self.record.declination = Some(declination);
        self.record.galactic_longitude_deg = Some(galactic_longitude_deg);
        self.record.galactic_latitude_deg = Some(galactic_latitude_deg);
    }

    /// Validate required fields and build the record
    pub fn finish(self, required: &[CatalogField]) -> Result<PulsarRecord, RecordError> {
        if let Some(&field) = required.iter().find(|&&field| !self.has(field)) {
            return Err(RecordError::MissingRequired { field });
        }

        let mut record = self.record;
        match (record.period, record.frequency) {
            (Some(p0), None) => record.frequency = reciprocal(p0),
            (None, Some(f0)) => record.period = reciprocal(f0),
            _ => {}
        }

        Ok(record)
    }
}

fn reciprocal(value: f64) -> Option<f64> {
    if value != 0.0 && value.is_finite() {
        Some(1.0 / value)
    } else {
        None
    }
}
