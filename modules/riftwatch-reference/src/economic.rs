use anyhow::Result;
use riftwatch_common::EconomicRow;
use std::path::Path;

/// `nigeria_econ.csv`: `State,LGA,Fuel_Price,Inflation`. Loaded once at
/// startup and treated as an immutable snapshot.
#[derive(Debug, Clone, Default)]
pub struct EconomicTable {
    rows: Vec<EconomicRow>,
}

impl EconomicTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();
        for record in reader.deserialize() {
            let row: CsvRow = record?;
            rows.push(EconomicRow {
                state: row.state,
                lga: row.lga,
                fuel_price: row.fuel_price,
                inflation: row.inflation,
            });
        }
        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<EconomicRow>) -> Self {
        Self { rows }
    }

    /// Case-insensitive exact `(state, lga)` match; falls back to the first
    /// row matching `state` alone when no LGA-level row exists.
    pub fn lookup(&self, state: &str, lga: &str) -> Option<&EconomicRow> {
        self.rows
            .iter()
            .find(|r| r.state.eq_ignore_ascii_case(state) && r.lga.eq_ignore_ascii_case(lga))
            .or_else(|| self.rows.iter().find(|r| r.state.eq_ignore_ascii_case(state)))
    }
}

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "LGA")]
    lga: String,
    #[serde(rename = "Fuel_Price")]
    fuel_price: f64,
    #[serde(rename = "Inflation")]
    inflation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EconomicTable {
        EconomicTable::from_rows(vec![
            EconomicRow {
                state: "Lagos".into(),
                lga: "Ikeja".into(),
                fuel_price: 700.0,
                inflation: 22.0,
            },
            EconomicRow {
                state: "Lagos".into(),
                lga: "Surulere".into(),
                fuel_price: 650.0,
                inflation: 18.0,
            },
        ])
    }

    #[test]
    fn exact_match_case_insensitive() {
        let table = sample();
        let row = table.lookup("lagos", "IKEJA").unwrap();
        assert_eq!(row.fuel_price, 700.0);
    }

    #[test]
    fn falls_back_to_state_when_lga_absent() {
        let table = sample();
        let row = table.lookup("Lagos", "Epe").unwrap();
        assert_eq!(row.lga, "Ikeja");
    }

    #[test]
    fn no_match_returns_none() {
        let table = sample();
        assert!(table.lookup("Kano", "Municipal").is_none());
    }
}
