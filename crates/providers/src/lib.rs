//! Provider abstractions for image tagging.
//!
//! An [`ImageTagger`] maps an image path to an ordered list of descriptive
//! tag strings. Any model, remote service, or local inference engine that
//! satisfies the trait is substitutable; the worker core never sees past it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub mod noop;
pub mod openai;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("not implemented")]
    NotImplemented,
    #[error("unreadable image: {0}")]
    UnreadableImage(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

/// The image-understanding capability. Implementations return tags that are
/// already lowercase, trimmed, and non-empty.
#[async_trait::async_trait]
pub trait ImageTagger: Send + Sync {
    async fn tag(&self, image_path: &Path) -> Result<Vec<String>, ProviderError>;
}

/// Splits raw model output on commas into normalized tag strings.
/// Entries are lowercased and trimmed; empty ones are dropped.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

#[derive(Default, Clone)]
pub struct TaggerRegistry {
    taggers: HashMap<String, Arc<dyn ImageTagger>>,
    pub preferred: Option<String>,
}

impl TaggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tagger(mut self, name: &str, tagger: Arc<dyn ImageTagger>) -> Self {
        self.taggers.insert(name.to_string(), tagger);
        self
    }

    pub fn set_preferred(mut self, name: &str) -> Self {
        self.preferred = Some(name.to_string());
        self
    }

    pub fn tagger(&self, name: Option<&str>) -> Result<Arc<dyn ImageTagger>, ProviderError> {
        let key = name
            .map(str::to_string)
            .or_else(|| self.preferred.clone())
            .ok_or_else(|| ProviderError::UnknownProvider("no tagger configured".into()))?;
        self.taggers
            .get(&key)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownProvider(key))
    }
}

#[cfg(test)]
mod tests {
    use super::parse_tag_list;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let tags = parse_tag_list(" Cat, INDOOR ,  golden retriever ");
        assert_eq!(tags, vec!["cat", "indoor", "golden retriever"]);
    }

    #[test]
    fn parse_drops_empty_entries() {
        let tags = parse_tag_list("cat,, ,indoor,");
        assert_eq!(tags, vec!["cat", "indoor"]);
    }

    #[test]
    fn parse_empty_output_yields_no_tags() {
        assert!(parse_tag_list("").is_empty());
        assert!(parse_tag_list(" , ,").is_empty());
    }
}
