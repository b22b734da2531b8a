use std::env;
use std::time::Duration;

/// Process-wide configuration, loaded once at startup and handed by
/// reference to every component. Missing required variables are fatal:
/// a misconfigured process must refuse to start rather than limp along
/// with defaults that silently disable a data source.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub broker_url: String,

    pub model_api_key: String,
    pub model_base_url: String,
    pub model_name: String,

    pub sources_path: String,
    pub reference_data_dir: String,
    pub automation_log_path: String,
    pub high_risk_alert_path: String,

    /// Gates every outbound HTTP call across all ingestor sources (default 10).
    pub max_concurrent_connections: usize,
    /// Gates concurrent calls to the classification model (default 5).
    pub max_concurrent_processing: usize,

    pub request_timeout: Duration,
    pub fetch_timeout: Duration,
    pub model_timeout: Duration,

    pub ingest_cron: String,
    pub extraction_poll_interval: Duration,
    pub categorization_poll_interval: Duration,
    pub risk_poll_interval: Duration,

    pub base_risk_score: f64,
    pub inflation_threshold: f64,
    pub fuel_price_threshold: f64,
    pub surge_threshold_pct: f64,
    pub high_risk_alert_threshold: f64,
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn optional_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn optional_env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn optional_env_secs(key: &str, default: u64) -> Duration {
    let secs = env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default);
    Duration::from_secs(secs)
}

impl Config {
    /// Load configuration from the environment. Panics on missing required
    /// variables — invalid configuration is fatal at startup (see spec's
    /// error handling design).
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            broker_url: required_env("BROKER_URL"),

            model_api_key: required_env("MODEL_API_KEY"),
            model_base_url: optional_env("MODEL_BASE_URL", "https://api.openai.com/v1"),
            model_name: optional_env("MODEL_NAME", "gpt-4o-mini"),

            sources_path: optional_env("SOURCES_PATH", "config/sources.json"),
            reference_data_dir: optional_env("REFERENCE_DATA_DIR", "data"),
            automation_log_path: optional_env(
                "AUTOMATION_LOG_PATH",
                "data/automation_logs.json",
            ),
            high_risk_alert_path: optional_env(
                "HIGH_RISK_ALERT_PATH",
                "data/high_risk_alerts.json",
            ),

            max_concurrent_connections: optional_env_usize("MAX_CONCURRENT_CONNECTIONS", 10),
            max_concurrent_processing: optional_env_usize("MAX_CONCURRENT_PROCESSING", 5),

            request_timeout: optional_env_secs("REQUEST_TIMEOUT", 30),
            fetch_timeout: optional_env_secs("FETCH_TIMEOUT", 15),
            model_timeout: optional_env_secs("MODEL_TIMEOUT", 30),

            ingest_cron: optional_env("INGEST_CRON", "*/15 * * * *"),
            extraction_poll_interval: optional_env_secs("EXTRACTION_POLL_INTERVAL", 30),
            categorization_poll_interval: optional_env_secs(
                "CATEGORIZATION_POLL_INTERVAL",
                300,
            ),
            risk_poll_interval: optional_env_secs("RISK_POLL_INTERVAL", 30),

            base_risk_score: optional_env_f64("BASE_RISK_SCORE", 30.0),
            inflation_threshold: optional_env_f64("INFLATION_THRESHOLD", 20.0),
            fuel_price_threshold: optional_env_f64("FUEL_PRICE_THRESHOLD", 650.0),
            surge_threshold_pct: optional_env_f64("SURGE_THRESHOLD_PCT", 20.0),
            high_risk_alert_threshold: optional_env_f64("HIGH_RISK_ALERT_THRESHOLD", 85.0),
        }
    }

    /// Log configuration with secrets redacted to their length only.
    pub fn log_redacted(&self) {
        tracing::info!(
            database_url = %redact_url(&self.database_url),
            broker_url = %redact_url(&self.broker_url),
            model_base_url = %self.model_base_url,
            model_name = %self.model_name,
            model_api_key_len = self.model_api_key.len(),
            max_concurrent_connections = self.max_concurrent_connections,
            max_concurrent_processing = self.max_concurrent_processing,
            "configuration loaded"
        );
    }
}

fn redact_url(url: &str) -> String {
    match url.find("://") {
        Some(idx) => format!("{}://***", &url[..idx]),
        None => "***".to_string(),
    }
}
