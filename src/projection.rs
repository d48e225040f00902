//! Sky positions prepared for an all-sky (Aitoff) projection.
//!
//! Pulsars are split into normal and millisecond populations. Only records
//! with a usable position, period, frequency and a positive dispersion
//! measure take part; the rest are counted as excluded.

use serde::Serialize;

use crate::models::PulsarRecord;

/// Projection-ready position of one pulsar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkyPosition {
    pub name: String,

    /// Galactic longitude in radians, (-pi, pi]
    pub longitude_rad: f64,

    /// Galactic latitude in radians
    pub latitude_rad: f64,

    pub period: f64,
    pub frequency: f64,
    pub dispersion_measure: f64,
}

impl SkyPosition {
    /// `None` when the record lacks any value the projection needs
    pub fn from_record(record: &PulsarRecord) -> Option<Self> {
        let period = record.period().filter(|&p| p != 0.0)?;
        let frequency = record.frequency().filter(|&f| f != 0.0)?;
        let dispersion_measure = record.dispersion_measure().filter(|&dm| dm > 0.0)?;

        Some(Self {
            name: record.display_name().to_string(),
            longitude_rad: record.galactic_longitude_rad()?,
            latitude_rad: record.galactic_latitude_rad()?,
            period,
            frequency,
            dispersion_measure,
        })
    }
}

/// Normal and millisecond pulsar populations
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkyPartition {
    pub normal: Vec<SkyPosition>,
    pub millisecond: Vec<SkyPosition>,

    /// Records missing a position, period, frequency or dispersion measure
    pub excluded: usize,
}

impl SkyPartition {
    pub fn len(&self) -> usize {
        self.normal.len() + self.millisecond.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split records into normal and millisecond pulsars
///
/// Records without a period derivative are placed with the normal
/// pulsars.
pub fn partition_sky_positions(records: &[PulsarRecord]) -> SkyPartition {
    let mut partition = SkyPartition::default();

    for record in records {
        match SkyPosition::from_record(record) {
            Some(position) if record.is_millisecond_pulsar() => {
                partition.millisecond.push(position)
            }
            Some(position) => partition.normal.push(position),
            None => partition.excluded += 1,
        }
    }

    partition
}
