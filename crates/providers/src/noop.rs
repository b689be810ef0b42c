use crate::{ImageTagger, ProviderError};
use std::path::Path;

#[derive(Debug, Default)]
pub struct NoopTagger;

#[async_trait::async_trait]
impl ImageTagger for NoopTagger {
    async fn tag(&self, _image_path: &Path) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::NotImplemented)
    }
}
