use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Severity of a parsed conflict event, as assigned by the model or the
/// rule-based fallback extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "moderate" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" | "severe" => Ok(Self::Critical),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// Category assigned to an Article by the Classifier (either the model or
/// the rule-based fallback). `Unknown` is both a valid terminal state and
/// the categorization queue predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    Banditry,
    Kidnapping,
    GunmenViolence,
    FarmerHerderClashes,
    Unknown,
}

impl std::fmt::Display for ConflictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConflictType::Banditry => "Banditry",
            ConflictType::Kidnapping => "Kidnapping",
            ConflictType::GunmenViolence => "Gunmen Violence",
            ConflictType::FarmerHerderClashes => "Farmer-Herder Clashes",
            ConflictType::Unknown => "Unknown",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ConflictType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Banditry" => Ok(Self::Banditry),
            "Kidnapping" => Ok(Self::Kidnapping),
            "Gunmen Violence" => Ok(Self::GunmenViolence),
            "Farmer-Herder Clashes" => Ok(Self::FarmerHerderClashes),
            "Unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown conflict type: {other}")),
        }
    }
}

/// Primary driver attributed to a parsed event, used by the Risk Engine's
/// climate-conflict correlation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConflictDriver {
    Economic,
    Environmental,
    Social,
}

impl std::fmt::Display for ConflictDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictDriver::Economic => write!(f, "Economic"),
            ConflictDriver::Environmental => write!(f, "Environmental"),
            ConflictDriver::Social => write!(f, "Social"),
        }
    }
}

impl std::str::FromStr for ConflictDriver {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "economic" => Ok(Self::Economic),
            "environmental" => Ok(Self::Environmental),
            "social" => Ok(Self::Social),
            other => Err(format!("unknown conflict driver: {other}")),
        }
    }
}

/// Risk band derived solely from `risk_score` (see `RiskLevel::from_score`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            RiskLevel::Critical
        } else if score >= 60.0 {
            RiskLevel::High
        } else if score >= 40.0 {
            RiskLevel::Medium
        } else if score >= 20.0 {
            RiskLevel::Low
        } else {
            RiskLevel::Minimal
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::Minimal => "Minimal",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GenderBreakdown {
    #[serde(default)]
    pub male: u32,
    #[serde(default)]
    pub female: u32,
    #[serde(default)]
    pub tbd: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Casualties {
    #[serde(default)]
    pub fatalities: u32,
    #[serde(default)]
    pub injured: u32,
    #[serde(default)]
    pub kidnap_victims: u32,
    #[serde(default)]
    pub gender_data: GenderBreakdown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Geography {
    #[serde(default = "unknown_string")]
    pub state: String,
    #[serde(default = "unknown_string")]
    pub lga: String,
    #[serde(default = "unknown_string")]
    pub community: String,
}

fn unknown_string() -> String {
    "Unknown".to_string()
}

/// Extracted feature set attached to an Article. `conflict_type = Unknown`
/// places the article on the categorization queue (see Classifier).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Features {
    pub conflict_type: ConflictType,
    /// 0..100, clamped; `None` until the Classifier assigns a category.
    pub confidence: Option<u8>,
    #[serde(default)]
    pub casualties: Casualties,
    #[serde(default)]
    pub geography: Geography,
    #[serde(default)]
    pub verification_needed: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            conflict_type: ConflictType::Unknown,
            confidence: None,
            casualties: Casualties::default(),
            geography: Geography::default(),
            verification_needed: false,
        }
    }
}

/// A deduplicated, fingerprinted news item produced by the Ingestor.
/// Unique by `url`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Article {
    pub title: String,
    pub content: String,
    pub source: String,
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub features: Features,
    pub fingerprint: String,
    pub veracity_score: f64,
    pub source_count: u32,
}

impl Article {
    /// `is_verified ⇔ veracity_score > 0.8`.
    pub fn is_verified(&self) -> bool {
        self.veracity_score > 0.8
    }
}

/// A structured extraction from an Article: event type, place, severity,
/// and optional social signals. Identity is `source_url`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParsedEvent {
    pub event_type: String,
    pub state: String,
    pub lga: String,
    pub severity: Severity,
    pub source_title: String,
    pub source_url: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// 0..100.
    pub sentiment_intensity: Option<u8>,
    #[serde(default)]
    pub hate_speech_indicators: Vec<String>,
    pub conflict_driver: Option<ConflictDriver>,
    pub parsed_at: DateTime<Utc>,
}

/// The scored, explained output keyed by `source_url`. Upsert semantics:
/// exactly one RiskSignal exists per `source_url` at any time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RiskSignal {
    pub event_type: String,
    pub state: String,
    pub lga: String,
    pub severity: Severity,
    pub fuel_price: f64,
    pub inflation: f64,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub source_title: String,
    pub source_url: String,
    pub trigger_reason: String,

    pub flood_inundation_index: Option<f64>,
    pub precipitation_anomaly: Option<f64>,
    pub vegetation_health_index: Option<f64>,

    pub mining_proximity_km: Option<f64>,
    pub mining_site_name: Option<String>,
    #[serde(default)]
    pub high_funding_potential: bool,
    pub informal_taxation_rate: Option<f64>,

    pub border_activity: Option<String>,
    #[serde(default)]
    pub lakurawa_presence: bool,
    pub border_permeability_score: Option<f64>,
    pub group_affiliation: Option<String>,
    #[serde(default)]
    pub sophisticated_ied_usage: bool,

    #[serde(default)]
    pub high_escalation_potential: bool,
    pub conflict_driver: Option<ConflictDriver>,
    pub climate_impact_zone: Option<String>,

    #[serde(default)]
    pub surge_detected: bool,
    pub surge_percentage_increase: Option<f64>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub calculated_at: DateTime<Utc>,
}

/// `(state, lga) -> (fuel_price, inflation)`, with state-level fallback
/// when no exact LGA row exists.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EconomicRow {
    pub state: String,
    pub lga: String,
    pub fuel_price: f64,
    pub inflation: f64,
}

/// Slider inputs for the interactive what-if simulation. Each is 0..100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct SimulationParameters {
    pub fuel_price_index: f64,
    pub inflation_rate: f64,
    pub chatter_intensity: f64,
}
