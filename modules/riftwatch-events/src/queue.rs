/// The three durable queues the pipeline stages communicate through.
/// Delivery is at-least-once with manual ack — a consumer acks on success
/// and nacks without requeue on a permanent parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Queue {
    ScrapedArticles,
    ParsedEvents,
    RiskSignals,
}

impl Queue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Queue::ScrapedArticles => "scraped_articles",
            Queue::ParsedEvents => "parsed_events",
            Queue::RiskSignals => "risk_signals",
        }
    }
}

impl std::fmt::Display for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message pulled off a queue. `tag` identifies the delivery for the
/// matching `Bus::ack`/`Bus::nack` call; it carries no meaning beyond that.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub tag: i64,
    pub payload: serde_json::Value,
}
