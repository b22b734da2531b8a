use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use crate::geo::point_in_ring;

/// One row of `climate_data.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClimateRow {
    pub state: String,
    pub lga: String,
    #[serde(default)]
    pub flood_inundation_index: f64,
    #[serde(default)]
    pub precipitation_anomaly: f64,
    #[serde(default)]
    pub vegetation_health_index: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ClimateTable {
    rows: Vec<ClimateRow>,
}

impl ClimateTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let rows: Vec<ClimateRow> = serde_json::from_str(&text)?;
        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<ClimateRow>) -> Self {
        Self { rows }
    }

    /// Exact `(state, lga)` match, case-insensitive.
    pub fn lookup(&self, state: &str, lga: &str) -> Option<&ClimateRow> {
        self.rows
            .iter()
            .find(|r| r.state.eq_ignore_ascii_case(state) && r.lga.eq_ignore_ascii_case(lga))
    }
}

/// Impact severity attached to a climate stress polygon; drives both the
/// score bonus and the human-readable `conflict_driver` attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ImpactZone {
    High,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    Medium,
    Low,
}

impl ImpactZone {
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s {
            "High" => Some(Self::High),
            "Medium-High" => Some(Self::MediumHigh),
            "Medium" => Some(Self::Medium),
            "Low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Canonical GeoJSON label, matching §6's fixed set verbatim
    /// (`Debug` would render `MediumHigh`, dropping the hyphen).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::MediumHigh => "Medium-High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// A climate stress polygon: `climate_indicators.geojson` feature properties
/// plus the first ring of its geometry, flattened for ray-casting.
#[derive(Debug, Clone)]
pub struct ClimatePolygon {
    pub region: String,
    pub indicator: String,
    pub recession_index: f64,
    pub impact_zone: ImpactZone,
    pub conflict_correlation: f64,
    pub ring: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Default)]
pub struct ClimatePolygons {
    polygons: Vec<ClimatePolygon>,
}

#[derive(Debug, Deserialize)]
struct GeoJsonFeatureCollection {
    features: Vec<GeoJsonFeature>,
}

#[derive(Debug, Deserialize)]
struct GeoJsonFeature {
    geometry: GeoJsonGeometry,
    properties: GeoJsonProperties,
}

#[derive(Debug, Deserialize)]
struct GeoJsonGeometry {
    coordinates: Vec<Vec<(f64, f64)>>,
}

#[derive(Debug, Deserialize)]
struct GeoJsonProperties {
    region: String,
    indicator: String,
    #[serde(default)]
    recession_index: f64,
    impact_zone: String,
    #[serde(default)]
    conflict_correlation: f64,
}

impl ClimatePolygons {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let collection: GeoJsonFeatureCollection = serde_json::from_str(&text)?;
        let polygons = collection
            .features
            .into_iter()
            .filter_map(|f| {
                let ring = f.geometry.coordinates.into_iter().next()?;
                let impact_zone = ImpactZone::from_str_loose(&f.properties.impact_zone)?;
                Some(ClimatePolygon {
                    region: f.properties.region,
                    indicator: f.properties.indicator,
                    recession_index: f.properties.recession_index,
                    impact_zone,
                    conflict_correlation: f.properties.conflict_correlation,
                    ring,
                })
            })
            .collect();
        Ok(Self { polygons })
    }

    pub fn from_polygons(polygons: Vec<ClimatePolygon>) -> Self {
        Self { polygons }
    }

    /// First polygon (in load order) whose first ring contains `(lon, lat)`.
    pub fn containing(&self, lon: f64, lat: f64) -> Option<&ClimatePolygon> {
        self.polygons
            .iter()
            .find(|p| point_in_ring(lon, lat, &p.ring))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn climate_lookup_is_case_insensitive() {
        let table = ClimateTable::from_rows(vec![ClimateRow {
            state: "Lagos".into(),
            lga: "Ikeja".into(),
            flood_inundation_index: 25.0,
            precipitation_anomaly: 1.2,
            vegetation_health_index: 0.4,
        }]);
        assert!(table.lookup("LAGOS", "ikeja").is_some());
        assert!(table.lookup("Lagos", "Epe").is_none());
    }

    #[test]
    fn polygon_containment() {
        let polygons = ClimatePolygons::from_polygons(vec![ClimatePolygon {
            region: "Sahel".into(),
            indicator: "drought".into(),
            recession_index: 0.8,
            impact_zone: ImpactZone::High,
            conflict_correlation: 0.7,
            ring: vec![(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)],
        }]);
        assert!(polygons.containing(1.0, 1.0).is_some());
        assert!(polygons.containing(10.0, 10.0).is_none());
    }
}
