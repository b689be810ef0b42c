//! One tagging cycle: run the tagger over the next untagged image and
//! persist the produced tags as a single transaction.

use crate::config::AppConfig;
use crate::models::{MediaItem, AI_CONFIDENCE, AI_SOURCE};
use crate::selector;
use anyhow::Context;
use providers::noop::NoopTagger;
use providers::openai::{OpenAiConfig, OpenAiTagger};
use providers::{ImageTagger, TaggerRegistry};
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Tagged { media_id: String, tags: Vec<String> },
    Failed { media_id: String },
    Idle,
}

/// Tags one media item and commits every produced tag row together.
///
/// Any failure, inference or persistence alike, propagates before the
/// commit, so the item either gains its full tag set or stays untouched.
pub async fn process_item(
    pool: &SqlitePool,
    tagger: &dyn ImageTagger,
    item: &MediaItem,
) -> anyhow::Result<Vec<String>> {
    let tags = tagger
        .tag(Path::new(&item.path))
        .await
        .with_context(|| format!("tagging {}", item.path))?;

    let mut tx = pool.begin().await?;
    for tag in &tags {
        sqlx::query("INSERT INTO tags (media_id, tag, confidence, source) VALUES (?, ?, ?, ?)")
            .bind(&item.id)
            .bind(tag)
            .bind(AI_CONFIDENCE)
            .bind(AI_SOURCE)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit()
        .await
        .with_context(|| format!("committing tags for {}", item.id))?;
    Ok(tags)
}

/// Runs one full work cycle. Per-item failures are contained here: the item
/// is reported and left untagged, and the error never reaches the caller.
/// Only store read failures propagate as `Err`.
pub async fn run_cycle(
    pool: &SqlitePool,
    tagger: &dyn ImageTagger,
    exclude: &[String],
) -> anyhow::Result<CycleOutcome> {
    let Some(item) = selector::next_untagged_image(pool, exclude).await? else {
        return Ok(CycleOutcome::Idle);
    };

    info!(media_id = %item.id, path = %item.path, "tagging");
    match process_item(pool, tagger, &item).await {
        Ok(tags) if !tags.is_empty() => {
            info!(media_id = %item.id, ?tags, "tagged");
            Ok(CycleOutcome::Tagged {
                media_id: item.id,
                tags,
            })
        }
        Ok(_) => {
            // An empty tag set leaves the completion marker unset; treat it
            // like a failure so the item is passed over until the next idle
            // pass instead of being re-selected immediately.
            warn!(media_id = %item.id, path = %item.path, "tagger produced no tags");
            Ok(CycleOutcome::Failed { media_id: item.id })
        }
        Err(e) => {
            warn!(media_id = %item.id, path = %item.path, "tagging failed: {:#}", e);
            Ok(CycleOutcome::Failed { media_id: item.id })
        }
    }
}

pub fn build_registry(config: &AppConfig) -> TaggerRegistry {
    let mut reg = TaggerRegistry::new().with_tagger("noop", Arc::new(NoopTagger));

    if let Some(key) = std::env::var_os("OPENAI_API_KEY") {
        let base_url = std::env::var_os("OPENAI_BASE_URL")
            .map(|v| v.to_string_lossy().into_owned())
            .unwrap_or_else(|| "https://api.openai.com".to_string());
        let tagger = OpenAiTagger::new(OpenAiConfig {
            api_key: key.to_string_lossy().into_owned(),
            base_url,
            model: config.tagger.model.clone(),
        });
        reg = reg.with_tagger("openai", Arc::new(tagger));
    }

    reg.set_preferred(&config.tagger.provider)
}
