//! Sky coordinate handling for catalogue positions.
//!
//! ATNF blocks give positions either as J2000 equatorial strings
//! (`RAJ 00:06:04.8`, `DECJ +18:34:59`) or as ecliptic degrees
//! (`ELONG`, `ELAT`). [`reconcile_coordinates`] turns whichever is present
//! into galactic coordinates. Everything here is pure arithmetic on its
//! arguments.

use serde::Serialize;

use crate::constants::{EQUATORIAL_TO_GALACTIC, J2000_OBLIQUITY_DEG};

/// J2000 equatorial position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquatorialCoord {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

/// Galactic position in degrees, longitude in [0, 360)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GalacticCoord {
    pub l_deg: f64,
    pub b_deg: f64,
}

/// Why reconciliation left its inputs untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CoordinateFallback {
    /// Neither equatorial nor ecliptic position was supplied
    NoPosition,
    /// Both equatorial and ecliptic positions were supplied
    BothSupplied,
    /// The branch that applied could not parse its inputs
    Unparseable,
}

/// Outcome of [`reconcile_coordinates`]
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// Equatorial position derived from ecliptic, galactic from that
    FromEcliptic {
        right_ascension: String,
        declination: String,
        galactic: GalacticCoord,
    },
    /// Galactic position derived from the supplied equatorial strings
    FromEquatorial {
        right_ascension: String,
        declination: String,
        galactic: GalacticCoord,
    },
    /// The four inputs, returned as given
    Unchanged {
        right_ascension: String,
        declination: String,
        ecliptic_longitude: String,
        ecliptic_latitude: String,
        reason: CoordinateFallback,
    },
}

impl Reconciliation {
    pub fn galactic(&self) -> Option<GalacticCoord> {
        match self {
            Reconciliation::FromEcliptic { galactic, .. }
            | Reconciliation::FromEquatorial { galactic, .. } => Some(*galactic),
            Reconciliation::Unchanged { .. } => None,
        }
    }
}

/// Fold a [0, 360) longitude into (-180, 180]
pub fn normalize_longitude_deg(longitude_deg: f64) -> f64 {
    if longitude_deg > 180.0 {
        longitude_deg - 360.0
    } else {
        longitude_deg
    }
}

/// Pad `H`, `H:M` or `D`, `D:M` to the full three component form
pub fn pad_sexagesimal(coord: &str) -> String {
    let coord = coord.trim();
    match coord.split(':').count() {
        1 => format!("{}:00:00", coord),
        2 => format!("{}:00", coord),
        _ => coord.to_string(),
    }
}

/// Parse `[+-]A[:B[:C]]` into `A + B/60 + C/3600`
///
/// The sign is taken from the text so `-00:30:00` stays negative.
pub fn parse_sexagesimal(coord: &str) -> Option<f64> {
    let trimmed = coord.trim();
    let negative = trimmed.starts_with('-');
    let body = trimmed.trim_start_matches(['+', '-']);
    if body.is_empty() {
        return None;
    }

    let parts: Vec<&str> = body.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut value = 0.0;
    let mut scale = 1.0;
    for part in parts {
        let component = part.trim().parse::<f64>().ok()?;
        if !component.is_finite() || component < 0.0 {
            return None;
        }
        value += component / scale;
        scale *= 60.0;
    }

    Some(if negative { -value } else { value })
}

/// Right ascension string (hours) to degrees
pub fn parse_right_ascension(coord: &str) -> Option<f64> {
    parse_sexagesimal(&pad_sexagesimal(coord)).map(|hours| hours * 15.0)
}

/// Declination string (degrees) to degrees
pub fn parse_declination(coord: &str) -> Option<f64> {
    parse_sexagesimal(&pad_sexagesimal(coord)).filter(|dec| dec.abs() <= 90.0)
}

/// Ecliptic angle in decimal degrees or `D:M:S`
pub fn parse_ecliptic_angle(coord: &str) -> Option<f64> {
    if coord.contains(':') {
        parse_sexagesimal(coord)
    } else {
        coord.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

fn format_sexagesimal(value: f64, decimals: usize, signed: bool, wrap_units: Option<u64>) -> String {
    let sign = if value < 0.0 {
        "-"
    } else if signed {
        "+"
    } else {
        ""
    };

    let scale = 10u64.pow(decimals as u32);
    let mut total = (value.abs() * 3600.0 * scale as f64).round() as u64;
    if let Some(units) = wrap_units {
        total %= units * 3600 * scale;
    }

    let fraction = total % scale;
    let seconds = total / scale;
    let (whole, minutes, secs) = (seconds / 3600, (seconds / 60) % 60, seconds % 60);

    if decimals == 0 {
        format!("{}{:02}:{:02}:{:02}", sign, whole, minutes, secs)
    } else {
        format!(
            "{}{:02}:{:02}:{:02}.{:0width$}",
            sign,
            whole,
            minutes,
            secs,
            fraction,
            width = decimals
        )
    }
}

/// Degrees to an `HH:MM:SS.ss` right ascension string
pub fn format_right_ascension(ra_deg: f64) -> String {
    format_sexagesimal(ra_deg.rem_euclid(360.0) / 15.0, 2, false, Some(24))
}

/// Degrees to a `+DD:MM:SS.s` declination string
pub fn format_declination(dec_deg: f64) -> String {
    format_sexagesimal(dec_deg, 1, true, None)
}

fn to_cartesian(lon_deg: f64, lat_deg: f64) -> [f64; 3] {
    let (lon, lat) = (lon_deg.to_radians(), lat_deg.to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

fn to_spherical(v: [f64; 3]) -> (f64, f64) {
    let lon = v[1].atan2(v[0]).to_degrees().rem_euclid(360.0);
    let lat = v[2].clamp(-1.0, 1.0).asin().to_degrees();
    (lon, lat)
}

/// Ecliptic (J2000 mean obliquity) to equatorial
pub fn ecliptic_to_equatorial(lon_deg: f64, lat_deg: f64) -> EquatorialCoord {
    let [x, y, z] = to_cartesian(lon_deg, lat_deg);
    let obliquity = J2000_OBLIQUITY_DEG.to_radians();
    let (sin_e, cos_e) = obliquity.sin_cos();

    // Rotation about x by +obliquity
    let rotated = [x, y * cos_e - z * sin_e, y * sin_e + z * cos_e];
    let (ra_deg, dec_deg) = to_spherical(rotated);
    EquatorialCoord { ra_deg, dec_deg }
}

/// J2000 equatorial to galactic
pub fn equatorial_to_galactic(ra_deg: f64, dec_deg: f64) -> GalacticCoord {
    let v = to_cartesian(ra_deg, dec_deg);
    let m = &EQUATORIAL_TO_GALACTIC;
    let rotated = [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ];
    let (l_deg, b_deg) = to_spherical(rotated);
    GalacticCoord { l_deg, b_deg }
}

fn is_zero_equatorial(coord: &str) -> bool {
    coord.trim().is_empty() || parse_sexagesimal(&pad_sexagesimal(coord)) == Some(0.0)
}

fn is_zero_ecliptic(coord: &str) -> bool {
    coord.trim().is_empty() || parse_ecliptic_angle(coord) == Some(0.0)
}

fn ecliptic_or_zero(coord: &str) -> Option<f64> {
    if coord.trim().is_empty() {
        Some(0.0)
    } else {
        parse_ecliptic_angle(coord)
    }
}

/// Derive galactic coordinates from whichever position a record supplies
///
/// Zero placeholders (`00:00:00` for equatorial, `0` for ecliptic) mark an
/// absent position:
/// - no equatorial, some ecliptic: ecliptic -> equatorial -> galactic
/// - some equatorial, no ecliptic: equatorial -> galactic
/// - otherwise the inputs come back unchanged
pub fn reconcile_coordinates(
    right_ascension: &str,
    declination: &str,
    ecliptic_longitude: &str,
    ecliptic_latitude: &str,
) -> Reconciliation {
    let unchanged = |reason| Reconciliation::Unchanged {
        right_ascension: right_ascension.to_string(),
        declination: declination.to_string(),
        ecliptic_longitude: ecliptic_longitude.to_string(),
        ecliptic_latitude: ecliptic_latitude.to_string(),
        reason,
    };

    let no_equatorial = is_zero_equatorial(right_ascension) && is_zero_equatorial(declination);
    let no_ecliptic = is_zero_ecliptic(ecliptic_longitude) && is_zero_ecliptic(ecliptic_latitude);

    if no_equatorial {
        if no_ecliptic {
            return unchanged(CoordinateFallback::NoPosition);
        }

        let (Some(lon), Some(lat)) = (
            ecliptic_or_zero(ecliptic_longitude),
            ecliptic_or_zero(ecliptic_latitude),
        ) else {
            return unchanged(CoordinateFallback::Unparseable);
        };
        if lat.abs() > 90.0 {
            return unchanged(CoordinateFallback::Unparseable);
        }

        let equatorial = ecliptic_to_equatorial(lon, lat);
        return Reconciliation::FromEcliptic {
            right_ascension: format_right_ascension(equatorial.ra_deg),
            declination: format_declination(equatorial.dec_deg),
            galactic: equatorial_to_galactic(equatorial.ra_deg, equatorial.dec_deg),
        };
    }

    if no_ecliptic {
        let (Some(ra_deg), Some(dec_deg)) = (
            parse_right_ascension(right_ascension),
            parse_declination(declination),
        ) else {
            return unchanged(CoordinateFallback::Unparseable);
        };

        return Reconciliation::FromEquatorial {
            right_ascension: right_ascension.to_string(),
            declination: declination.to_string(),
            galactic: equatorial_to_galactic(ra_deg, dec_deg),
        };
    }

    unchanged(CoordinateFallback::BothSupplied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude_deg(108.172), 108.172);
        assert_eq!(normalize_longitude_deg(180.0), 180.0);
        assert_eq!(normalize_longitude_deg(305.923), 305.923 - 360.0);

        for l in [180.5, 200.0, 270.0, 359.999] {
            let folded = normalize_longitude_deg(l);
            assert_eq!(folded, l - 360.0);
            assert!(folded <= 180.0 && folded > -180.0);
        }
    }

    #[test]
    fn test_pad_sexagesimal() {
        assert_eq!(pad_sexagesimal("12"), "12:00:00");
        assert_eq!(pad_sexagesimal("-05:30"), "-05:30:00");
        assert_eq!(pad_sexagesimal("00:06:04.8"), "00:06:04.8");
    }

    #[test]
    fn test_parse_sexagesimal_sign() {
        assert_eq!(parse_sexagesimal("-00:30:00"), Some(-0.5));
        assert_eq!(parse_sexagesimal("+18:34:59"), Some(18.0 + 34.0 / 60.0 + 59.0 / 3600.0));
        assert_eq!(parse_sexagesimal("12:xx:00"), None);
        assert_eq!(parse_sexagesimal("1:2:3:4"), None);
        assert_eq!(parse_sexagesimal(""), None);
    }

    #[test]
    fn test_equatorial_to_galactic_known_pulsar() {
        // J0006+1834 is listed at Gl 108.172, Gb -42.985
        let ra = parse_right_ascension("00:06:04.8").unwrap();
        let dec = parse_declination("+18:34:59").unwrap();
        let gal = equatorial_to_galactic(ra, dec);
        assert_abs_diff_eq!(gal.l_deg, 108.172, epsilon = 1e-3);
        assert_abs_diff_eq!(gal.b_deg, -42.985, epsilon = 1e-3);
    }

    #[test]
    fn test_galactic_centre() {
        let gal = equatorial_to_galactic(266.40499, -28.93617);
        assert!(gal.l_deg < 1e-3 || gal.l_deg > 360.0 - 1e-3);
        assert_abs_diff_eq!(gal.b_deg, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_ecliptic_to_equatorial() {
        let eq = ecliptic_to_equatorial(90.0, 0.0);
        assert_abs_diff_eq!(eq.ra_deg, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(eq.dec_deg, J2000_OBLIQUITY_DEG, epsilon = 1e-9);

        let pole = ecliptic_to_equatorial(0.0, 90.0);
        assert_abs_diff_eq!(pole.ra_deg, 270.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pole.dec_deg, 90.0 - J2000_OBLIQUITY_DEG, epsilon = 1e-9);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_right_ascension(90.0), "06:00:00.00");
        assert_eq!(format_right_ascension(359.9999999), "00:00:00.00");
        assert_eq!(format_declination(J2000_OBLIQUITY_DEG), "+23:26:21.4");
        assert_eq!(format_declination(-0.5), "-00:30:00.0");
    }

    #[test]
    fn test_reconcile_from_equatorial() {
        let result = reconcile_coordinates("00:06:04.8", "+18:34:59", "0", "0");
        match result {
            Reconciliation::FromEquatorial {
                right_ascension,
                declination,
                galactic,
            } => {
                assert_eq!(right_ascension, "00:06:04.8");
                assert_eq!(declination, "+18:34:59");
                assert_abs_diff_eq!(galactic.l_deg, 108.172, epsilon = 1e-3);
            }
            other => panic!("unexpected reconciliation: {:?}", other),
        }
    }

    #[test]
    fn test_reconcile_pads_short_equatorial() {
        let short = reconcile_coordinates("18", "-10", "0", "0").galactic().unwrap();
        let full = equatorial_to_galactic(270.0, -10.0);
        assert_abs_diff_eq!(short.l_deg, full.l_deg, epsilon = 1e-9);
        assert_abs_diff_eq!(short.b_deg, full.b_deg, epsilon = 1e-9);
    }

    #[test]
    fn test_reconcile_from_ecliptic() {
        let result = reconcile_coordinates("00:00:00", "00:00:00", "90", "0");
        match result {
            Reconciliation::FromEcliptic {
                right_ascension,
                declination,
                galactic,
            } => {
                assert_eq!(right_ascension, "06:00:00.00");
                assert_eq!(declination, "+23:26:21.4");
                assert_abs_diff_eq!(galactic.l_deg, 186.372, epsilon = 1e-3);
                assert_abs_diff_eq!(galactic.b_deg, -0.020, epsilon = 1e-3);
            }
            other => panic!("unexpected reconciliation: {:?}", other),
        }
    }

    #[test]
    fn test_reconcile_fallbacks() {
        let none = reconcile_coordinates("00:00:00", "00:00:00", "0", "0");
        assert_eq!(
            none,
            Reconciliation::Unchanged {
                right_ascension: "00:00:00".to_string(),
                declination: "00:00:00".to_string(),
                ecliptic_longitude: "0".to_string(),
                ecliptic_latitude: "0".to_string(),
                reason: CoordinateFallback::NoPosition,
            }
        );

        let both = reconcile_coordinates("00:06:04.8", "+18:34:59", "10.5", "12.1");
        assert!(matches!(
            both,
            Reconciliation::Unchanged {
                reason: CoordinateFallback::BothSupplied,
                ..
            }
        ));
        assert_eq!(both.galactic(), None);

        let bad = reconcile_coordinates("ab:cd", "+18:34:59", "0", "0");
        assert!(matches!(
            bad,
            Reconciliation::Unchanged {
                reason: CoordinateFallback::Unparseable,
                ..
            }
        ));
    }
}
