use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AttendanceError;
use crate::model::settings::AttendanceSettings;

/// Mean earth radius used by the haversine formula, in metres.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

const UNAVAILABLE: &str = "Location unavailable";
const NOT_SUPPORTED: &str = "Geolocation not supported";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    #[schema(example = 10.7769)]
    pub latitude: f64,

    #[schema(example = 106.7009)]
    pub longitude: f64,
}

impl GeoPoint {
    /// Returns `None` unless latitude is in [-90, 90] and longitude in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }
}

/// Great-circle distance between two points in metres.
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // rounding can push h a hair past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Inclusive: a point exactly on the boundary is inside.
pub fn is_within_radius(current: GeoPoint, office: GeoPoint, radius_meters: f64) -> bool {
    distance_meters(current, office) <= radius_meters
}

/// What the client device reported for its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationFix {
    Available(GeoPoint),
    /// Permission refused or the lookup timed out.
    Unavailable,
    /// The device has no location capability.
    NotSupported,
}

impl LocationFix {
    /// Parses the `"lat, lon"` wire form. Sentinels and anything unreadable
    /// are treated as an unavailable location.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == NOT_SUPPORTED {
            return LocationFix::NotSupported;
        }

        let mut parts = raw.split(',').map(str::trim);
        let point = match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lon), None) => match (lat.parse::<f64>(), lon.parse::<f64>()) {
                (Ok(lat), Ok(lon)) => GeoPoint::new(lat, lon),
                _ => None,
            },
            _ => None,
        };

        point.map_or(LocationFix::Unavailable, LocationFix::Available)
    }

    pub fn point(&self) -> Option<GeoPoint> {
        match self {
            LocationFix::Available(p) => Some(*p),
            _ => None,
        }
    }
}

impl From<Option<&str>> for LocationFix {
    fn from(raw: Option<&str>) -> Self {
        raw.map_or(LocationFix::Unavailable, LocationFix::parse)
    }
}

impl fmt::Display for LocationFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationFix::Available(p) => write!(f, "{}, {}", p.latitude, p.longitude),
            LocationFix::Unavailable => f.write_str(UNAVAILABLE),
            LocationFix::NotSupported => f.write_str(NOT_SUPPORTED),
        }
    }
}

/// Gate applied before any check-in or check-out is recorded.
pub fn validate_location(
    settings: Option<&AttendanceSettings>,
    fix: &LocationFix,
) -> Result<(), AttendanceError> {
    let Some((office, radius_meters)) = settings.and_then(AttendanceSettings::geofence) else {
        return Ok(());
    };

    let current = fix.point().ok_or(AttendanceError::LocationUnavailable)?;

    if !is_within_radius(current, office, radius_meters) {
        return Err(AttendanceError::OutOfRange { radius_meters });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // metres per degree of latitude on the haversine sphere
    const METERS_PER_DEGREE: f64 = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn office_settings(radius: f64) -> AttendanceSettings {
        AttendanceSettings {
            office: Some(point(10.0, 106.0)),
            radius_meters: radius,
        }
    }

    fn meters_north_of_office(meters: f64) -> LocationFix {
        LocationFix::Available(point(10.0 + meters / METERS_PER_DEGREE, 106.0))
    }

    #[test]
    fn coincident_points_are_zero_apart() {
        let p = point(48.8566, 2.3522);
        assert_eq!(distance_meters(p, p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = point(52.52, 13.405);
        let b = point(-33.8688, 151.2093);
        assert_eq!(distance_meters(a, b), distance_meters(b, a));
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = distance_meters(point(0.0, 0.0), point(0.0, 1.0));
        assert!((d - 111_195.0).abs() < 111_195.0 * 0.01, "got {d}");
    }

    #[test]
    fn antipodal_points_stay_finite() {
        let d = distance_meters(point(0.0, 0.0), point(0.0, 180.0));
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_METERS).abs() < 1.0);
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let a = point(10.0, 106.0);
        let b = point(10.001, 106.001);
        let d = distance_meters(b, a);
        assert!(is_within_radius(b, a, d));
        assert!(!is_within_radius(b, a, d - 0.001));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(GeoPoint::new(90.5, 0.0).is_none());
        assert!(GeoPoint::new(0.0, -180.5).is_none());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_none());
        assert!(GeoPoint::new(-90.0, 180.0).is_some());
    }

    #[test]
    fn parses_wire_format() {
        assert_eq!(LocationFix::parse("10.5, 106.25"), LocationFix::Available(point(10.5, 106.25)));
        assert_eq!(LocationFix::parse("10.5,106.25"), LocationFix::Available(point(10.5, 106.25)));
        assert_eq!(LocationFix::parse("Location unavailable"), LocationFix::Unavailable);
        assert_eq!(LocationFix::parse("Geolocation not supported"), LocationFix::NotSupported);
        assert_eq!(LocationFix::parse("abc, 1"), LocationFix::Unavailable);
        assert_eq!(LocationFix::parse("95, 1"), LocationFix::Unavailable);
        assert_eq!(LocationFix::from(None), LocationFix::Unavailable);
    }

    #[test]
    fn formats_wire_format() {
        assert_eq!(LocationFix::Available(point(10.5, 106.25)).to_string(), "10.5, 106.25");
        assert_eq!(LocationFix::NotSupported.to_string(), "Geolocation not supported");
    }

    #[test]
    fn no_office_accepts_anything() {
        assert!(validate_location(None, &LocationFix::Unavailable).is_ok());

        let no_office = AttendanceSettings {
            office: None,
            radius_meters: 100.0,
        };
        assert!(validate_location(Some(&no_office), &LocationFix::NotSupported).is_ok());
        assert!(validate_location(Some(&no_office), &meters_north_of_office(10_000.0)).is_ok());
    }

    #[test]
    fn office_without_location_is_rejected() {
        let settings = office_settings(100.0);
        assert!(matches!(
            validate_location(Some(&settings), &LocationFix::Unavailable),
            Err(AttendanceError::LocationUnavailable)
        ));
        assert!(matches!(
            validate_location(Some(&settings), &LocationFix::NotSupported),
            Err(AttendanceError::LocationUnavailable)
        ));
    }

    #[test]
    fn far_location_is_out_of_range() {
        let settings = office_settings(100.0);
        match validate_location(Some(&settings), &meters_north_of_office(500.0)) {
            Err(AttendanceError::OutOfRange { radius_meters }) => assert_eq!(radius_meters, 100.0),
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn near_location_passes() {
        let settings = office_settings(100.0);
        assert!(validate_location(Some(&settings), &meters_north_of_office(50.0)).is_ok());
    }
}
