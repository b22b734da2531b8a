use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use crate::geo::haversine_km;

/// One entry of `mining_activity.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct MiningSite {
    pub site_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub informal_taxation_rate: f64,
}

#[derive(Debug, Clone, Default)]
pub struct MiningSites {
    sites: Vec<MiningSite>,
}

/// A mining site paired with its distance from a queried point.
pub struct NearestSite<'a> {
    pub site: &'a MiningSite,
    pub distance_km: f64,
}

impl MiningSites {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let sites: Vec<MiningSite> = serde_json::from_str(&text)?;
        Ok(Self { sites })
    }

    pub fn from_sites(sites: Vec<MiningSite>) -> Self {
        Self { sites }
    }

    /// Nearest site by Haversine distance, or `None` if there are no sites
    /// loaded or the query point is missing (caller's responsibility to
    /// skip the call when coordinates are absent).
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<NearestSite<'_>> {
        self.sites
            .iter()
            .map(|site| NearestSite {
                site,
                distance_km: haversine_km(lat, lon, site.latitude, site.longitude),
            })
            .min_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_picks_closest() {
        let sites = MiningSites::from_sites(vec![
            MiningSite {
                site_name: "Far".into(),
                latitude: 20.0,
                longitude: 20.0,
                informal_taxation_rate: 0.3,
            },
            MiningSite {
                site_name: "Near".into(),
                latitude: 12.11,
                longitude: 5.928,
                informal_taxation_rate: 0.5,
            },
        ]);
        let nearest = sites.nearest(12.12, 5.93).unwrap();
        assert_eq!(nearest.site.site_name, "Near");
        assert!(nearest.distance_km < 3.0);
    }

    #[test]
    fn empty_sites_returns_none() {
        let sites = MiningSites::default();
        assert!(sites.nearest(0.0, 0.0).is_none());
    }
}
