use async_trait::async_trait;
use reqwest::{header, Method};
use std::sync::Arc;

use super::client::BackendClient;
use crate::contract::model::ImageUpload;
use crate::domain::ports::ImageStore;

/// Offer images in the configured storage bucket.
pub struct RemoteImageStore {
    client: Arc<BackendClient>,
}

impl RemoteImageStore {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageStore for RemoteImageStore {
    async fn upload(&self, path: &str, image: &ImageUpload) -> anyhow::Result<String> {
        let url = self.client.endpoint(
            ["storage", "v1", "object", self.client.bucket()]
                .into_iter()
                .chain(path.split('/')),
        )?;
        let builder = self
            .client
            .request(Method::POST, url)
            .header(header::CONTENT_TYPE, &image.content_type)
            .header(header::CACHE_CONTROL, "3600")
            .header("x-upsert", "false")
            .body(image.bytes.clone());
        self.client.send(builder, "upload image").await?;

        Ok(self.client.public_object_url(path)?.to_string())
    }
}
