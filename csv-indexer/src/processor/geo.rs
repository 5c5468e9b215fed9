//! Geo point synthesis from separate latitude/longitude columns.
//!
//! A coordinate that parses to exactly zero counts as missing: the source data
//! uses 0 for "no coordinate". A genuine point on the equator or the prime
//! meridian is therefore dropped.

use csv_indexer_shared::GeoPoint;

/// Source columns feeding the geo point and the field it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoColumns {
    pub latitude: String,
    pub longitude: String,
    pub target: String,
}

impl GeoColumns {
    pub fn new(
        latitude: impl Into<String>,
        longitude: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            target: target.into(),
        }
    }
}

/// Parse one coordinate; zero, non-finite and non-numeric values are absent.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    if value == 0.0 || !value.is_finite() {
        return None;
    }
    Some(value)
}

/// Build a geo point when both coordinates are present and non-zero.
pub fn synthesize_geo_point(latitude: &str, longitude: &str) -> Option<GeoPoint> {
    Some(GeoPoint::new(
        parse_coordinate(latitude)?,
        parse_coordinate(longitude)?,
    ))
}
