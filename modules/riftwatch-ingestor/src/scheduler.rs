use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use cron::Schedule;
use riftwatch_common::BoundedAuditLog;
use riftwatch_events::{Bus, Store};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cycle::run_cycle;
use crate::fetch::Fetcher;
use crate::source::SourceConfig;

/// Drives the Ingestor's cron worker: `max_instances = 1` means a tick that
/// fires while the previous cycle is still running is skipped outright
/// rather than queued, matching the spec's scheduler contract.
pub struct IngestScheduler {
    schedule: Schedule,
    running: Arc<AtomicBool>,
}

impl IngestScheduler {
    pub fn new(cron_expr: &str) -> anyhow::Result<Self> {
        let schedule = Schedule::from_str(&quintuple_to_sextuple(cron_expr))?;
        Ok(Self {
            schedule,
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Run until `shutdown` is cancelled, firing one ingestion cycle per
    /// schedule occurrence. Intended to be spawned as a background task by
    /// the orchestrator; on shutdown the wait for the next tick is
    /// abandoned immediately; a cycle already in flight always runs to
    /// completion (see spec §5 "drain in-flight").
    pub async fn run_forever(
        &self,
        sources: Vec<SourceConfig>,
        store: Arc<dyn Store>,
        bus: Arc<dyn Bus>,
        fetcher: Fetcher,
        audit_log: Arc<BoundedAuditLog>,
        shutdown: CancellationToken,
    ) {
        loop {
            let Some(next) = self.schedule.upcoming(Utc).next() else {
                error!("cron schedule produced no upcoming occurrence, stopping scheduler");
                return;
            };
            let now = Utc::now();
            let wait = (next - now).to_std().unwrap_or(Duration::from_secs(1));
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = shutdown.cancelled() => {
                    info!("ingest scheduler shutting down, no cycle in flight");
                    return;
                }
            }

            if self.running.swap(true, Ordering::SeqCst) {
                warn!("previous ingest cycle still running, skipping this tick (max_instances=1)");
                continue;
            }

            let running = self.running.clone();
            let sources = sources.clone();
            let store = store.clone();
            let bus = bus.clone();
            let audit_log = audit_log.clone();
            let fetcher = &fetcher;
            let summary = run_cycle(&sources, &store, &bus, fetcher, &audit_log).await;
            info!(status = summary.status, "ingest tick finished");
            running.store(false, Ordering::SeqCst);
        }
    }
}

/// The `cron` crate expects six fields (with seconds); the spec's cron
/// strings are the conventional five-field form. Prepend a `0` seconds
/// field when only five are given.
fn quintuple_to_sextuple(expr: &str) -> String {
    if expr.split_whitespace().count() == 5 {
        format!("0 {expr}")
    } else {
        expr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_conventional_five_field_cron() {
        let scheduler = IngestScheduler::new("*/15 * * * *").unwrap();
        assert!(scheduler.schedule.upcoming(Utc).next().is_some());
    }
}
