//! Catalogue conventions and numeric constants.
//!
//! Sentinel tokens, header markers and keyword names used by the ATNF
//! exports, plus the fixed thresholds used when summarising records.

// =============================================================================
// Text conventions
// =============================================================================

/// Token standing in for a value the catalogue does not have
pub const MISSING_VALUE: &str = "*";

/// First field of a delimited header row (`#,NAME,Gl(deg),...`)
pub const HEADER_MARKER: &str = "#";

/// First character of a block terminator line (`@-----...`)
pub const BLOCK_TERMINATOR: char = '@';

/// First character of a pass-through comment line in block files
pub const COMMENT_PREFIX: char = '#';

/// Equatorial coordinate placeholder meaning "no position supplied"
pub const ZERO_SEXAGESIMAL: &str = "00:00:00";

/// Ecliptic coordinate placeholder meaning "no position supplied"
pub const ZERO_ECLIPTIC: &str = "0";

/// Default name for records without a catalogue identifier
pub const UNKNOWN_NAME: &str = "Unknown";

// =============================================================================
// ATNF block keywords
// =============================================================================

pub mod keywords {
    pub const PSRJ: &str = "PSRJ";
    pub const PSRB: &str = "PSRB";
    pub const RAJ: &str = "RAJ";
    pub const DECJ: &str = "DECJ";
    pub const ELONG: &str = "ELONG";
    pub const ELAT: &str = "ELAT";
    pub const P0: &str = "P0";
    pub const P1: &str = "P1";
    pub const F0: &str = "F0";
    pub const DM: &str = "DM";
    pub const W10: &str = "W10";
    pub const W50: &str = "W50";
    pub const BINARY: &str = "BINARY";
    pub const PB: &str = "PB";
    pub const A1: &str = "A1";
    pub const DIST: &str = "DIST";
    pub const DIST_DM: &str = "DIST_DM";
    pub const AGE: &str = "AGE";
    pub const EDOT: &str = "EDOT";
    pub const PMTOT: &str = "PMTOT";
}

// =============================================================================
// Astronomy
// =============================================================================

/// Mean obliquity of the ecliptic at J2000, degrees
pub const J2000_OBLIQUITY_DEG: f64 = 23.4392911;

/// Rotation from J2000 equatorial to galactic cartesian coordinates
pub const EQUATORIAL_TO_GALACTIC: [[f64; 3]; 3] = [
    [-0.054_875_560_416_215_4, -0.873_437_090_234_885, -0.483_835_015_548_713_2],
    [0.494_109_427_875_583_7, -0.444_829_629_960_011_2, 0.746_982_244_497_218_9],
    [-0.867_666_149_019_004_7, -0.198_076_373_431_201_5, 0.455_983_776_175_066_9],
];

/// Periods below this (milliseconds) are candidate millisecond pulsars
pub const MSP_MAX_PERIOD_MS: f64 = 30.0;

/// Period derivatives below this are candidate millisecond pulsars
pub const MSP_MAX_PERIOD_DERIVATIVE: f64 = 1e-15;

// =============================================================================
// Profiles and histograms
// =============================================================================

/// Lower bound of rescaled profile amplitudes
pub const RESCALE_MIN: f64 = 0.0;

/// Upper bound of rescaled profile amplitudes
pub const RESCALE_MAX: f64 = 255.0;

/// Column (zero based) holding intensity in EPN ascii profiles
pub const EPN_INTENSITY_COLUMN: usize = 3;

/// Input extension of EPN ascii profiles
pub const EPN_PROFILE_EXTENSION: &str = "acn";

/// Output extension of rescaled profiles
pub const RESCALED_PROFILE_EXTENSION: &str = "asc";

/// Bin width used when the interquartile range collapses to zero
pub const FALLBACK_BIN_WIDTH: f64 = 60.0;
