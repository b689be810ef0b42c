use serde::{Deserialize, Serialize};

/// Source marker written with every tag this worker produces. Its presence
/// on at least one tag row is the sole "already processed" signal.
pub const AI_SOURCE: &str = "ai";

/// Confidence recorded for model-produced tags.
pub const AI_CONFIDENCE: f64 = 0.9;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MediaItem {
    pub id: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PendingMedia {
    pub id: String,
    pub path: String,
    pub indexed_at: Option<chrono::DateTime<chrono::Utc>>,
}
