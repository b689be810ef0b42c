//! Work discovery: finds catalog images that have no AI-sourced tags yet.

use crate::models::{MediaItem, PendingMedia, AI_SOURCE};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

/// Returns at most one image lacking an AI-sourced tag, in stable id order.
///
/// A pure read: nothing is marked or locked. `exclude` is a process-local
/// list of media ids to pass over this round (items that just failed); it is
/// never persisted.
pub async fn next_untagged_image(
    pool: &SqlitePool,
    exclude: &[String],
) -> anyhow::Result<Option<MediaItem>> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT m.id, m.path FROM media m \
         WHERE m.kind = 'image' \
         AND NOT EXISTS (SELECT 1 FROM tags t WHERE t.media_id = m.id AND t.source = ",
    );
    qb.push_bind(AI_SOURCE);
    qb.push(")");
    if !exclude.is_empty() {
        qb.push(" AND m.id NOT IN (");
        let mut separated = qb.separated(", ");
        for id in exclude {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");
    }
    qb.push(" ORDER BY m.id LIMIT 1");

    let item = qb
        .build_query_as::<MediaItem>()
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

pub async fn pending_count(pool: &SqlitePool) -> anyhow::Result<i64> {
    let row = sqlx::query(
        "SELECT COUNT(*) FROM media m \
         WHERE m.kind = 'image' \
         AND NOT EXISTS (SELECT 1 FROM tags t WHERE t.media_id = m.id AND t.source = ?)",
    )
    .bind(AI_SOURCE)
    .fetch_one(pool)
    .await?;
    Ok(row.get(0))
}

pub async fn pending_items(pool: &SqlitePool, limit: i64) -> anyhow::Result<Vec<PendingMedia>> {
    let items = sqlx::query_as::<_, PendingMedia>(
        "SELECT m.id, m.path, m.indexed_at FROM media m \
         WHERE m.kind = 'image' \
         AND NOT EXISTS (SELECT 1 FROM tags t WHERE t.media_id = m.id AND t.source = ?) \
         ORDER BY m.id LIMIT ?",
    )
    .bind(AI_SOURCE)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(items)
}
