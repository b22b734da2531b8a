use std::sync::Arc;
use std::time::Duration;

use ai_client::{Message, ModelClient};
use rand::Rng;
use tokio::sync::Semaphore;
use tracing::warn;

use crate::circuit_breaker::CircuitBreaker;

const RETRY_ATTEMPTS: u32 = 3;
const RETRY_BASE: Duration = Duration::from_secs(2);
const RETRY_MAX: Duration = Duration::from_secs(10);

/// Wraps a bare [`ModelClient`] with the classifier's resilience stack:
/// a bounded concurrency gate, a 3-attempt exponential backoff retry
/// budget, and a circuit breaker that short-circuits calls once the
/// backend looks down. Call sites never see an error for "circuit open" —
/// [`Resilient::complete`] returns `None` and the caller falls back to the
/// rule-based extractor.
pub struct Resilient {
    client: Arc<dyn ModelClient>,
    permits: Arc<Semaphore>,
    breaker: CircuitBreaker,
}

impl Resilient {
    pub fn new(client: Arc<dyn ModelClient>, max_concurrent_processing: usize) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(max_concurrent_processing.max(1))),
            breaker: CircuitBreaker::new(5, Duration::from_secs(30)),
        }
    }

    /// `None` means: don't bother the model (circuit open, or every retry
    /// exhausted) — fall back to the rule-based extractor.
    pub async fn complete(&self, messages: Vec<Message>) -> Option<String> {
        if !self.breaker.allow_call() {
            warn!("model circuit breaker open, skipping call");
            return None;
        }

        let _permit = match self.permits.acquire().await {
            Ok(p) => p,
            Err(_) => return None,
        };

        for attempt in 0..RETRY_ATTEMPTS {
            match self.client.complete(messages.clone()).await {
                Ok(text) => {
                    self.breaker.record_success();
                    return Some(text);
                }
                Err(err) => {
                    warn!(attempt, error = %err, "model call failed");
                    if attempt + 1 == RETRY_ATTEMPTS {
                        self.breaker.record_failure();
                        return None;
                    }
                    let backoff = (RETRY_BASE * 2u32.pow(attempt)).min(RETRY_MAX);
                    let jitter = Duration::from_millis(rand::rng().random_range(0..500));
                    tokio::time::sleep(backoff + jitter).await;
                }
            }
        }
        None
    }
}
