//! WKT point parsing for station geography columns.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static POINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*POINT\s*\(\s*(-?\d+(?:\.\d*)?|-?\.\d+)\s+(-?\d+(?:\.\d*)?|-?\.\d+)\s*\)\s*$")
        .expect("static WKT regex")
});

/// A geographic point. WKT stores longitude first; fields are named so the
/// order can never be silently swapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    /// `[lat, lon]`, the order marker APIs expect.
    pub fn lat_lon(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

/// Parses `POINT (<lon> <lat>)`. Returns `None` for anything else.
pub fn extract(wkt: &str) -> Option<GeoPoint> {
    let caps = POINT_RE.captures(wkt)?;
    let longitude = caps.get(1)?.as_str().parse().ok()?;
    let latitude = caps.get(2)?.as_str().parse().ok()?;
    Some(GeoPoint {
        longitude,
        latitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_keeps_wkt_order() {
        let p = extract("POINT (-73.94 40.78)").unwrap();
        assert_eq!(p.longitude, -73.94);
        assert_eq!(p.latitude, 40.78);
        assert_eq!(p.lat_lon(), [40.78, -73.94]);
    }

    #[test]
    fn test_extract_integers_and_negative_latitude() {
        let p = extract("POINT (151 -33.5)").unwrap();
        assert_eq!(p.longitude, 151.0);
        assert_eq!(p.latitude, -33.5);
    }

    #[test]
    fn test_extract_tolerates_spacing() {
        assert!(extract("POINT(-73.9 40.7)").is_some());
        assert!(extract("  POINT ( -73.9   40.7 )  ").is_some());
    }

    #[test]
    fn test_extract_malformed_returns_none() {
        assert_eq!(extract("NOT A POINT"), None);
        assert_eq!(extract(""), None);
        assert_eq!(extract("POINT (-73.94)"), None);
        assert_eq!(extract("POINT (abc 40.78)"), None);
        assert_eq!(extract("LINESTRING (1 2, 3 4)"), None);
        assert_eq!(extract("POINT (--1 2)"), None);
    }
}
