//! Parser configuration.
//!
//! The catalogue dialect is always chosen explicitly. Delimited exports
//! carry their column layout as data ([`DelimitedSchema`]) because the
//! ATNF web interface produces different column sets for the same fields;
//! block files map keywords to fields through a [`BlockSchema`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::constants::keywords;
use crate::error::{CatalogError, Result};
use crate::models::CatalogField;

/// Column-to-field mapping for comma separated exports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelimitedSchema {
    /// Field separator byte
    pub delimiter: u8,

    /// Zero based column index of each mapped field
    pub columns: BTreeMap<CatalogField, usize>,

    /// Fields that must be present for a line to become a record
    pub required: Vec<CatalogField>,
}

impl DelimitedSchema {
    /// `#,NAME,Gl(deg),Gb(deg),P0(s),P1,F0(Hz),DM`
    pub fn short_export() -> Self {
        let columns = [
            (CatalogField::Name, 1),
            (CatalogField::GalacticLongitude, 2),
            (CatalogField::GalacticLatitude, 3),
            (CatalogField::Period, 4),
            (CatalogField::PeriodDerivative, 5),
            (CatalogField::Frequency, 6),
            (CatalogField::DispersionMeasure, 7),
        ];

        Self {
            delimiter: b',',
            columns: columns.into_iter().collect(),
            required: vec![CatalogField::Name],
        }
    }

    /// `#,NAME,Gl,Gb,P0,P1,F0,DM,BINARY,PB,A1,BINCOMP,DIST,DIST_DM,AGE,EDOT,PMTOT`
    ///
    /// BINCOMP (column 11) is left unmapped.
    pub fn extended_export() -> Self {
        let mut schema = Self::short_export();
        schema.columns.extend([
            (CatalogField::BinaryType, 8),
            (CatalogField::BinaryPeriod, 9),
            (CatalogField::SemiMajorAxis, 10),
            (CatalogField::Distance, 12),
            (CatalogField::DistanceDm, 13),
            (CatalogField::CharacteristicAge, 14),
            (CatalogField::SpinDownLuminosity, 15),
            (CatalogField::ProperMotion, 16),
        ]);
        schema
    }

    /// Bind `field` to column `index`, replacing any previous binding
    pub fn with_column(mut self, field: CatalogField, index: usize) -> Self {
        self.columns.insert(field, index);
        self
    }

    pub fn with_required(mut self, field: CatalogField) -> Self {
        if !self.required.contains(&field) {
            self.required.push(field);
        }
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Reject layouts a parse pass could never satisfy
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(CatalogError::configuration("delimited schema maps no columns"));
        }

        for field in &self.required {
            if !self.columns.contains_key(field) {
                return Err(CatalogError::configuration(format!(
                    "required field {} has no column",
                    field
                )));
            }
        }

        let mut seen: BTreeMap<usize, CatalogField> = BTreeMap::new();
        for (&field, &index) in &self.columns {
            if let Some(other) = seen.insert(index, field) {
                return Err(CatalogError::configuration(format!(
                    "column {} is bound to both {} and {}",
                    index, other, field
                )));
            }
        }

        Ok(())
    }
}

impl Default for DelimitedSchema {
    fn default() -> Self {
        Self::short_export()
    }
}

/// Keyword-to-field mapping for `@`-delimited block files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSchema {
    /// Exact keyword (first token of a line) for each recognised field
    pub keywords: BTreeMap<String, CatalogField>,

    /// Keyword consulted for the name only when the primary name is absent
    pub fallback_name_keyword: Option<String>,

    /// Fields that must be present for a block to become a record
    pub required: Vec<CatalogField>,

    /// Derive galactic coordinates from equatorial or ecliptic positions
    pub reconcile_coordinates: bool,
}

impl BlockSchema {
    /// Keywords of the native ATNF catalogue format
    pub fn atnf() -> Self {
        let mapping = [
            (keywords::PSRJ, CatalogField::Name),
            (keywords::RAJ, CatalogField::RightAscension),
            (keywords::DECJ, CatalogField::Declination),
            (keywords::ELONG, CatalogField::EclipticLongitude),
            (keywords::ELAT, CatalogField::EclipticLatitude),
            (keywords::P0, CatalogField::Period),
            (keywords::P1, CatalogField::PeriodDerivative),
            (keywords::F0, CatalogField::Frequency),
            (keywords::DM, CatalogField::DispersionMeasure),
            (keywords::W10, CatalogField::PulseWidth10),
            (keywords::W50, CatalogField::PulseWidth50),
            (keywords::BINARY, CatalogField::BinaryType),
            (keywords::PB, CatalogField::BinaryPeriod),
            (keywords::A1, CatalogField::SemiMajorAxis),
            (keywords::DIST, CatalogField::Distance),
            (keywords::DIST_DM, CatalogField::DistanceDm),
            (keywords::AGE, CatalogField::CharacteristicAge),
            (keywords::EDOT, CatalogField::SpinDownLuminosity),
            (keywords::PMTOT, CatalogField::ProperMotion),
        ];

        Self {
            keywords: mapping
                .into_iter()
                .map(|(keyword, field)| (keyword.to_string(), field))
                .collect(),
            fallback_name_keyword: Some(keywords::PSRB.to_string()),
            required: Vec::new(),
            reconcile_coordinates: true,
        }
    }

    pub fn with_required(mut self, field: CatalogField) -> Self {
        if !self.required.contains(&field) {
            self.required.push(field);
        }
        self
    }

    pub fn without_coordinate_reconciliation(mut self) -> Self {
        self.reconcile_coordinates = false;
        self
    }

    pub fn field_for(&self, keyword: &str) -> Option<CatalogField> {
        self.keywords.get(keyword).copied()
    }

    pub fn validate(&self) -> Result<()> {
        if self.keywords.is_empty() {
            return Err(CatalogError::configuration("block schema maps no keywords"));
        }

        for field in &self.required {
            let derived = self.reconcile_coordinates
                && matches!(
                    field,
                    CatalogField::GalacticLongitude | CatalogField::GalacticLatitude
                );
            if !derived && !self.keywords.values().any(|f| f == field) {
                return Err(CatalogError::configuration(format!(
                    "required field {} has no keyword",
                    field
                )));
            }
        }

        Ok(())
    }
}

impl Default for BlockSchema {
    fn default() -> Self {
        Self::atnf()
    }
}

/// Input dialect, selected by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CatalogDialect {
    /// One record per delimited line
    Delimited(DelimitedSchema),
    /// One record per `@`-terminated keyword block
    Block(BlockSchema),
}

impl CatalogDialect {
    pub fn name(&self) -> &'static str {
        match self {
            CatalogDialect::Delimited(_) => "delimited",
            CatalogDialect::Block(_) => "block",
        }
    }
}

/// Configuration for a [`crate::catalog::CatalogRecordParser`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    pub dialect: CatalogDialect,

    /// Number of rejection messages kept in the parse statistics
    pub max_reported_errors: usize,
}

impl ParserConfig {
    pub fn delimited(schema: DelimitedSchema) -> Self {
        Self {
            dialect: CatalogDialect::Delimited(schema),
            ..Default::default()
        }
    }

    pub fn block(schema: BlockSchema) -> Self {
        Self {
            dialect: CatalogDialect::Block(schema),
            ..Default::default()
        }
    }

    pub fn with_max_reported_errors(mut self, max: usize) -> Self {
        self.max_reported_errors = max;
        self
    }

    pub fn validate(&self) -> Result<()> {
        debug!("Validating {} parser configuration", self.dialect.name());
        match &self.dialect {
            CatalogDialect::Delimited(schema) => schema.validate(),
            CatalogDialect::Block(schema) => schema.validate(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            dialect: CatalogDialect::Delimited(DelimitedSchema::default()),
            max_reported_errors: 100,
        }
    }
}
