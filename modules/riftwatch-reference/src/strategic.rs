use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// State-level strategic indicators from `nigeria_econ_indicators.csv`:
/// poverty, unemployment, migration pressure, mining density, and climate
/// vulnerability, each normalized to `[0,1]`.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategicRow {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Poverty_Rate")]
    pub poverty_rate: f64,
    #[serde(rename = "Unemployment_Rate")]
    pub unemployment_rate: f64,
    #[serde(rename = "Migration_Pressure")]
    pub migration_pressure: f64,
    #[serde(rename = "Mining_Density")]
    pub mining_density: f64,
    #[serde(rename = "Climate_Vulnerability")]
    pub climate_vulnerability: f64,
}

#[derive(Debug, Clone, Default)]
pub struct StrategicTable {
    rows: Vec<StrategicRow>,
}

impl StrategicTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();
        for record in reader.deserialize() {
            rows.push(record?);
        }
        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<StrategicRow>) -> Self {
        Self { rows }
    }

    /// Case-insensitive `state` match.
    pub fn lookup(&self, state: &str) -> Option<&StrategicRow> {
        self.rows.iter().find(|r| r.state.eq_ignore_ascii_case(state))
    }
}
