use async_trait::async_trait;

use crate::contract::model::ImageUpload;

/// Managed object storage for offer images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `image` under `path` (no overwrite) and return its public URL.
    async fn upload(&self, path: &str, image: &ImageUpload) -> anyhow::Result<String>;
}
