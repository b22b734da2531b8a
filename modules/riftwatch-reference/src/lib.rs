pub mod border;
pub mod climate;
pub mod economic;
pub mod geo;
pub mod mining;
pub mod strategic;
pub mod urban;

pub use border::{BorderActivity, BorderRow, BorderTable};
pub use climate::{ClimatePolygon, ClimatePolygons, ClimateRow, ClimateTable, ImpactZone};
pub use economic::EconomicTable;
pub use geo::{haversine_km, point_in_ring};
pub use mining::{MiningSite, MiningSites, NearestSite};
pub use strategic::{StrategicRow, StrategicTable};
pub use urban::is_urban_lga;

use anyhow::Result;
use std::path::Path;

/// All reference datasets, bulk-loaded at startup and immutable at runtime.
/// Passed by reference to the Risk Engine.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub economic: EconomicTable,
    pub climate: ClimateTable,
    pub climate_polygons: ClimatePolygons,
    pub mining: MiningSites,
    pub border: BorderTable,
    pub strategic: StrategicTable,
}

impl ReferenceData {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        Ok(Self {
            economic: EconomicTable::load(dir.join("nigeria_econ.csv"))?,
            climate: ClimateTable::load(dir.join("climate_data.json"))?,
            climate_polygons: ClimatePolygons::load(dir.join("climate_indicators.geojson"))?,
            mining: MiningSites::load(dir.join("mining_activity.json"))?,
            border: BorderTable::load(dir.join("border_signals.json"))?,
            strategic: StrategicTable::load(dir.join("nigeria_econ_indicators.csv"))?,
        })
    }
}
