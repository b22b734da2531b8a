use std::sync::Arc;

use anyhow::{Context, Result};
use riftwatch_classifier::{run_categorization_loop, run_extraction_loop, Resilient};
use riftwatch_common::{BoundedAuditLog, Config};
use riftwatch_events::{PgBus, PgStore};
use riftwatch_ingestor::{load_sources, Fetcher, IngestScheduler};
use riftwatch_reference::ReferenceData;
use riftwatch_risk::run_risk_loop;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    riftwatch_common::init_tracing();
    info!("RiftWatch starting...");

    let config = Arc::new(Config::from_env());
    config.log_redacted();

    let reference = Arc::new(
        ReferenceData::load(&config.reference_data_dir)
            .context("failed to load reference datasets")?,
    );
    let sources = load_sources(&config.sources_path).context("failed to load sources config")?;
    info!(count = sources.len(), "loaded source configuration");

    let store: Arc<dyn riftwatch_events::Store> =
        Arc::new(PgStore::connect(&config.database_url).await?);
    let bus: Arc<dyn riftwatch_events::Bus> = Arc::new(PgBus::connect(&config.broker_url).await?);

    let fetcher = Fetcher::new(config.max_concurrent_connections, config.fetch_timeout);
    let ingest_audit_log = Arc::new(BoundedAuditLog::load(&config.automation_log_path, 100));
    let high_risk_alert_log = Arc::new(BoundedAuditLog::load(&config.high_risk_alert_path, 20));
    let confidence_log = Arc::new(BoundedAuditLog::load(
        format!("{}.categorization", config.automation_log_path),
        10,
    ));

    let model_client: Arc<dyn ai_client::ModelClient> = Arc::new(ai_client::OpenAiCompatibleClient::new(
        config.model_api_key.clone(),
        config.model_base_url.clone(),
        config.model_name.clone(),
        config.model_timeout,
    ));
    let resilient_model = Arc::new(Resilient::new(model_client, config.max_concurrent_processing));

    let shutdown = CancellationToken::new();
    let scheduler = IngestScheduler::new(&config.ingest_cron)?;

    let ingest_task = tokio::spawn({
        let sources = sources.clone();
        let store = store.clone();
        let bus = bus.clone();
        let shutdown = shutdown.clone();
        let ingest_audit_log = ingest_audit_log.clone();
        async move {
            scheduler
                .run_forever(sources, store, bus, fetcher, ingest_audit_log, shutdown)
                .await;
        }
    });

    let extraction_task = tokio::spawn(run_extraction_loop(
        store.clone(),
        bus.clone(),
        resilient_model.clone(),
        config.extraction_poll_interval,
        shutdown.clone(),
    ));

    let categorization_task = tokio::spawn(run_categorization_loop(
        store.clone(),
        resilient_model.clone(),
        config.categorization_poll_interval,
        confidence_log.clone(),
        shutdown.clone(),
    ));

    let risk_task = tokio::spawn(run_risk_loop(
        store.clone(),
        bus.clone(),
        reference.clone(),
        config.clone(),
        high_risk_alert_log.clone(),
        config.risk_poll_interval,
        shutdown.clone(),
    ));

    tokio::signal::ctrl_c().await.context("failed to listen for ctrl-c")?;
    info!("shutdown signal received, draining in-flight work");
    shutdown.cancel();

    let drain_deadline = tokio::time::Duration::from_secs(30);
    let _ = tokio::time::timeout(
        drain_deadline,
        futures::future::join4(ingest_task, extraction_task, categorization_task, risk_task),
    )
    .await;

    info!("RiftWatch stopped");
    Ok(())
}
