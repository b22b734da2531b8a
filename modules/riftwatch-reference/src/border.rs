use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Border activity level for a `(state, lga)` pair, as recorded in
/// `border_signals.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum BorderActivity {
    Low,
    High,
    Critical,
}

impl BorderActivity {
    fn from_str_loose(s: &str) -> Option<Self> {
        match s {
            "Low" => Some(Self::Low),
            "High" => Some(Self::High),
            "Critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// One row of `border_signals.json`.
#[derive(Debug, Clone)]
pub struct BorderRow {
    pub state: String,
    pub lga: String,
    pub border_activity: BorderActivity,
    pub lakurawa_presence_confirmed: bool,
    pub border_permeability_score: f64,
    pub group_affiliation: Option<String>,
    pub sophisticated_ied_usage: bool,
}

#[derive(Debug, Deserialize)]
struct RawBorderRow {
    state: String,
    lga: String,
    border_activity: String,
    #[serde(default)]
    lakurawa_presence_confirmed: bool,
    #[serde(default)]
    border_permeability_score: f64,
    #[serde(default)]
    group_affiliation: Option<String>,
    #[serde(default)]
    sophisticated_ied_usage: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BorderTable {
    rows: Vec<BorderRow>,
}

impl BorderTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let raw: Vec<RawBorderRow> = serde_json::from_str(&text)?;
        let rows = raw
            .into_iter()
            .filter_map(|r| {
                Some(BorderRow {
                    state: r.state,
                    lga: r.lga,
                    border_activity: BorderActivity::from_str_loose(&r.border_activity)?,
                    lakurawa_presence_confirmed: r.lakurawa_presence_confirmed,
                    border_permeability_score: r.border_permeability_score,
                    group_affiliation: r.group_affiliation,
                    sophisticated_ied_usage: r.sophisticated_ied_usage,
                })
            })
            .collect();
        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<BorderRow>) -> Self {
        Self { rows }
    }

    pub fn lookup(&self, state: &str, lga: &str) -> Option<&BorderRow> {
        self.rows
            .iter()
            .find(|r| r.state.eq_ignore_ascii_case(state) && r.lga.eq_ignore_ascii_case(lga))
    }
}
