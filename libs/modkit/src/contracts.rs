use async_trait::async_trait;

/// Core module: DI/wiring only. `init` reads the module's configuration,
/// builds its services and publishes its client trait into the hub.
#[async_trait]
pub trait Module: Send + Sync + 'static {
    /// Stable module name; also the key of its configuration section.
    fn name(&self) -> &'static str;

    async fn init(&self, ctx: &crate::context::ModuleCtx) -> anyhow::Result<()>;
}
