//! The long-running worker: waits for the catalog store to exist, then
//! drains untagged images indefinitely.

use crate::config::AppConfig;
use crate::pipeline::{self, CycleOutcome};
use anyhow::Context;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

/// Runs until the process is terminated.
///
/// Startup: while the store's backing file is absent, poll for it on the
/// configured interval. The tagger provider is only constructed after the
/// store appears, since provider startup can be expensive and is wasted
/// work if the store never shows up.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let store_poll = Duration::from_secs(cfg.worker.store_poll_secs);
    let idle_poll = Duration::from_secs(cfg.worker.idle_poll_secs);

    wait_for_store(&cfg.database.path, store_poll).await;

    let registry = pipeline::build_registry(&cfg);
    let tagger = registry
        .tagger(Some(cfg.tagger.provider.as_str()))
        .context("selecting tagger provider")?;
    let pool = storage::connect(&cfg.database.path)
        .await
        .context("connecting to catalog store")?;

    info!(store = %cfg.database.path, provider = %cfg.tagger.provider, "worker running");
    serve(&pool, tagger, idle_poll).await
}

/// Blocks until the store's backing file exists, checking every `interval`.
pub async fn wait_for_store(path: &str, interval: Duration) {
    if storage::store_exists(path) {
        return;
    }
    info!(store = %path, "catalog store not found, waiting");
    while !storage::store_exists(path) {
        sleep(interval).await;
    }
    info!(store = %path, "catalog store appeared");
}

/// The steady-state loop. A busy queue is drained back to back, one item per
/// inference; an empty queue sleeps `idle_poll` between polls.
///
/// Items that fail are remembered in process-local memory and passed over so
/// one bad file cannot hold up the rest of the queue. The set is forgotten on
/// every idle pass, which is what retries failed items the next time work
/// appears.
async fn serve(
    pool: &SqlitePool,
    tagger: Arc<dyn providers::ImageTagger>,
    idle_poll: Duration,
) -> anyhow::Result<()> {
    let mut failed: HashSet<String> = HashSet::new();
    loop {
        let exclude: Vec<String> = failed.iter().cloned().collect();
        match pipeline::run_cycle(pool, tagger.as_ref(), &exclude).await {
            Ok(CycleOutcome::Tagged { .. }) => {}
            Ok(CycleOutcome::Failed { media_id }) => {
                failed.insert(media_id);
            }
            Ok(CycleOutcome::Idle) => {
                failed.clear();
                sleep(idle_poll).await;
            }
            Err(e) => {
                error!("work cycle failed: {:#}", e);
                sleep(idle_poll).await;
            }
        }
    }
}
