//! Station records, the map marker layer and the top-10 ranking.

use crate::geo::{self, GeoPoint};
use crate::source::{RawStation, parse_count};
use serde::Serialize;
use tracing::{debug, warn};

/// Initial map center, midtown Manhattan.
pub const MAP_CENTER: GeoPoint = GeoPoint {
    longitude: -73.94,
    latitude: 40.78,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRecord {
    pub name: String,
    pub location: Option<GeoPoint>,
    pub is_top10: bool,
    pub ridership: Option<i64>,
}

impl StationRecord {
    fn from_raw(raw: &RawStation, is_top10: bool) -> Self {
        StationRecord {
            name: raw.name.clone(),
            location: geo::extract(&raw.georeference),
            is_top10,
            ridership: raw.ridership.as_deref().and_then(|value| {
                parse_count(value).unwrap_or_else(|_| {
                    warn!(station = %raw.name, value, "Unparseable station ridership ignored");
                    None
                })
            }),
        }
    }

    /// True when the source row had a ridership cell that failed to parse.
    fn has_bad_ridership(&self, raw: &RawStation) -> bool {
        self.ridership.is_none() && raw.ridership.as_deref().is_some_and(|v| !v.trim().is_empty())
    }
}

/// Visual weight of a marker: top-10 stations are drawn larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerWeight {
    Regular,
    Top10,
}

impl MarkerWeight {
    pub fn radius(self) -> u32 {
        match self {
            MarkerWeight::Regular => 3,
            MarkerWeight::Top10 => 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationMarker {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub weight: MarkerWeight,
    pub radius: u32,
}

/// A station row dropped from the map because its geography did not parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedStation {
    pub name: String,
    pub georeference: String,
    pub is_top10: bool,
}

/// Everything the map needs: drawable markers plus the rows that were skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationLayer {
    pub center: GeoPoint,
    pub stations: Vec<StationRecord>,
    pub markers: Vec<StationMarker>,
    pub skipped: Vec<SkippedStation>,
    /// Stations whose `Ridership` cell was present but not a number.
    pub bad_ridership: Vec<String>,
}

impl StationLayer {
    /// Builds the layer from the full station list and the top-10 list.
    /// Top-10 markers come last so they are drawn on top.
    pub fn build(all: &[RawStation], top10: &[RawStation]) -> Self {
        let stations: Vec<StationRecord> = all
            .iter()
            .map(|r| StationRecord::from_raw(r, false))
            .chain(top10.iter().map(|r| StationRecord::from_raw(r, true)))
            .collect();

        let mut markers = Vec::with_capacity(stations.len());
        let mut skipped = Vec::new();
        let mut bad_ridership = Vec::new();
        let raws = all.iter().chain(top10);

        for (station, raw) in stations.iter().zip(raws) {
            if station.has_bad_ridership(raw) {
                bad_ridership.push(station.name.clone());
            }
            match station.location {
                Some(p) => {
                    let weight = if station.is_top10 {
                        MarkerWeight::Top10
                    } else {
                        MarkerWeight::Regular
                    };
                    markers.push(StationMarker {
                        name: station.name.clone(),
                        latitude: p.latitude,
                        longitude: p.longitude,
                        weight,
                        radius: weight.radius(),
                    });
                }
                None => skipped.push(SkippedStation {
                    name: station.name.clone(),
                    georeference: raw.georeference.clone(),
                    is_top10: station.is_top10,
                }),
            }
        }

        if !skipped.is_empty() {
            warn!(skipped = skipped.len(), "Stations with unparseable geography left off the map");
        }
        debug!(markers = markers.len(), "Station layer built");

        StationLayer {
            center: MAP_CENTER,
            stations,
            markers,
            skipped,
            bad_ridership,
        }
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// `"1. <name>"` labels for the top-10 stations, busiest first. Stations
/// without a ridership value sort last; equal values keep file order.
pub fn top10_ranking(stations: &[StationRecord]) -> Vec<String> {
    let mut ranked: Vec<&StationRecord> = stations.iter().filter(|s| s.is_top10).collect();
    ranked.sort_by(|a, b| b.ridership.cmp(&a.ridership));

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, geo: &str, ridership: Option<&str>) -> RawStation {
        RawStation {
            name: name.to_string(),
            georeference: geo.to_string(),
            ridership: ridership.map(str::to_string),
        }
    }

    #[test]
    fn test_build_skips_and_counts_bad_geography() {
        let all = vec![
            raw("Court Sq", "POINT (-73.94 40.75)", None),
            raw("Nowhere", "NOT A POINT", None),
        ];
        let top10 = vec![raw("Times Sq-42 St", "POINT (-73.987 40.755)", Some("1,000"))];

        let layer = StationLayer::build(&all, &top10);

        assert_eq!(layer.stations.len(), 3);
        assert_eq!(layer.markers.len(), 2);
        assert_eq!(layer.skipped_count(), 1);
        assert_eq!(layer.skipped[0].name, "Nowhere");
        assert_eq!(layer.stations[1].location, None);
    }

    #[test]
    fn test_markers_use_latitude_from_second_wkt_value() {
        let layer = StationLayer::build(&[raw("A", "POINT (-73.94 40.78)", None)], &[]);
        let m = &layer.markers[0];
        assert_eq!(m.latitude, 40.78);
        assert_eq!(m.longitude, -73.94);
        assert_eq!(m.weight, MarkerWeight::Regular);
    }

    #[test]
    fn test_top10_markers_are_heavier_and_last() {
        let layer = StationLayer::build(
            &[raw("A", "POINT (1 2)", None)],
            &[raw("B", "POINT (3 4)", Some("10"))],
        );
        let last = layer.markers.last().unwrap();
        assert_eq!(last.name, "B");
        assert_eq!(last.weight, MarkerWeight::Top10);
        assert!(last.radius > layer.markers[0].radius);
        assert_eq!(layer.stations[1].ridership, Some(10));
    }

    #[test]
    fn test_top10_ranking_orders_by_ridership() {
        let rows = vec![
            raw("Fulton St", "", Some("20,000")),
            raw("Times Sq", "", Some("60,000")),
            raw("Unknown", "", None),
            raw("Grand Central", "", Some("40,000")),
        ];
        let layer = StationLayer::build(&[raw("Court Sq", "", None)], &rows);
        assert_eq!(
            top10_ranking(&layer.stations),
            vec!["1. Times Sq", "2. Grand Central", "3. Fulton St", "4. Unknown"]
        );
    }

    #[test]
    fn test_unparseable_ridership_is_recorded() {
        let rows = vec![
            raw("Penn Station", "POINT (-73.99 40.75)", Some("n/a")),
            raw("Blank", "POINT (-73.98 40.74)", Some("")),
            raw("Fulton St", "POINT (-74.00 40.71)", Some("20,000")),
        ];
        let layer = StationLayer::build(&[], &rows);

        assert_eq!(layer.stations[0].ridership, None);
        assert_eq!(layer.bad_ridership, vec!["Penn Station"]);
        assert_eq!(
            top10_ranking(&layer.stations),
            vec!["1. Fulton St", "2. Penn Station", "3. Blank"]
        );
    }
}
