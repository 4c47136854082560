use std::sync::Arc;

use modkit::{Module, ModuleCtx, TracedClient};
use tracing::info;

use crate::config::{BackendMode, MarketplaceConfig};
use crate::contract::client::MarketplaceApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::MarketplaceLocalClient;
use crate::infra::events::TracingEventPublisher;
use crate::infra::memory::{seed_demo_data, MemoryBackend};
use crate::infra::remote::{
    BackendClient, RemoteAuth, RemoteImageStore, RemoteOffersRepository, RemoteRatingsRepository,
    RemoteUsersRepository,
};

/// Marketplace module: builds the configured backend and publishes
/// `dyn MarketplaceApi` into the client hub.
#[derive(Default)]
pub struct Marketplace;

impl Marketplace {
    pub const NAME: &'static str = "marketplace";
}

#[async_trait::async_trait]
impl Module for Marketplace {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let cfg = ctx.module_config::<MarketplaceConfig>()?;
        let client = build_client(&cfg)?;
        ctx.client_hub().register::<dyn MarketplaceApi>(client);
        info!(mode = ?cfg.backend.mode, "Marketplace client registered");
        Ok(())
    }
}

/// Client for the configured backend.
pub fn build_client(cfg: &MarketplaceConfig) -> anyhow::Result<Arc<dyn MarketplaceApi>> {
    match cfg.backend.mode {
        BackendMode::Memory => {
            let backend = Arc::new(MemoryBackend::new());
            if cfg.seed_demo_data {
                seed_demo_data(&backend, cfg.signup_points);
            }
            Ok(memory_client(backend, cfg.service_config()))
        }
        BackendMode::Remote => remote_client(cfg, TracedClient::default()),
    }
}

/// Client over an in-memory backend the caller keeps a handle to.
pub fn memory_client(backend: Arc<MemoryBackend>, config: ServiceConfig) -> Arc<dyn MarketplaceApi> {
    let service = Service::new(
        backend.clone(),
        backend.clone(),
        backend.clone(),
        backend.clone(),
        backend,
        Arc::new(TracingEventPublisher),
        config,
    );
    Arc::new(MarketplaceLocalClient::new(Arc::new(service)))
}

/// Client over the hosted backend described by `cfg.backend`.
pub fn remote_client(
    cfg: &MarketplaceConfig,
    http: TracedClient,
) -> anyhow::Result<Arc<dyn MarketplaceApi>> {
    let backend = &cfg.backend;
    if backend.url.trim().is_empty() {
        anyhow::bail!("modules.marketplace.backend.url is required in remote mode");
    }
    if backend.anon_key.trim().is_empty() {
        anyhow::bail!("modules.marketplace.backend.anon_key is required in remote mode");
    }

    let client = Arc::new(BackendClient::new(
        backend.url.trim(),
        backend.anon_key.trim(),
        backend.image_bucket.clone(),
        http,
    )?);
    let service = Service::new(
        Arc::new(RemoteUsersRepository::new(client.clone())),
        Arc::new(RemoteOffersRepository::new(client.clone())),
        Arc::new(RemoteRatingsRepository::new(client.clone())),
        Arc::new(RemoteAuth::new(client.clone())),
        Arc::new(RemoteImageStore::new(client)),
        Arc::new(TracingEventPublisher),
        cfg.service_config(),
    );
    Ok(Arc::new(MarketplaceLocalClient::new(Arc::new(service))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use modkit::{ConfigProvider, ModuleCtxBuilder};
    use std::collections::HashMap;

    struct MapProvider(HashMap<String, serde_json::Value>);

    impl ConfigProvider for MapProvider {
        fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
            self.0.get(module_name)
        }
    }

    #[tokio::test]
    async fn init_registers_memory_client() {
        let mut sections = HashMap::new();
        sections.insert(
            Marketplace::NAME.to_string(),
            serde_json::json!({ "backend": { "mode": "memory" } }),
        );
        let ctx = ModuleCtxBuilder::new()
            .with_config_provider(Arc::new(MapProvider(sections)))
            .build()
            .for_module(Marketplace::NAME);

        Marketplace.init(&ctx).await.unwrap();

        let api = ctx.client_hub().get::<dyn MarketplaceApi>().unwrap();
        assert_eq!(api.fetch_offers().await.unwrap().len(), 3);
    }

    #[test]
    fn remote_mode_requires_url_and_key() {
        let mut cfg = MarketplaceConfig {
            backend: BackendConfig {
                mode: BackendMode::Remote,
                ..BackendConfig::default()
            },
            ..MarketplaceConfig::default()
        };
        assert!(build_client(&cfg).is_err());

        cfg.backend.url = "https://demo.example".into();
        assert!(build_client(&cfg).is_err());

        cfg.backend.anon_key = "anon".into();
        assert!(build_client(&cfg).is_ok());
    }
}
