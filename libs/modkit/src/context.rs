use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::client_hub::ClientHub;

/// Provider of module-specific configuration (raw JSON sections only).
pub trait ConfigProvider: Send + Sync {
    /// Returns raw JSON section for the module, if any.
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

/// Context handed to [`crate::Module::init`]: configuration plus the hub the
/// module publishes its clients into.
#[derive(Clone)]
pub struct ModuleCtx {
    config_provider: Option<Arc<dyn ConfigProvider>>,
    client_hub: Arc<ClientHub>,
    module_name: Option<Arc<str>>,
}

pub struct ModuleCtxBuilder {
    inner: ModuleCtx,
}

impl Default for ModuleCtxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleCtxBuilder {
    pub fn new() -> Self {
        Self {
            inner: ModuleCtx {
                config_provider: None,
                client_hub: Arc::new(ClientHub::default()),
                module_name: None,
            },
        }
    }

    pub fn with_config_provider(mut self, p: Arc<dyn ConfigProvider>) -> Self {
        self.inner.config_provider = Some(p);
        self
    }

    pub fn with_client_hub(mut self, hub: Arc<ClientHub>) -> Self {
        self.inner.client_hub = hub;
        self
    }

    pub fn build(self) -> ModuleCtx {
        self.inner
    }
}

impl ModuleCtx {
    /// Scope context to a specific module name.
    pub fn for_module(mut self, name: &str) -> Self {
        self.module_name = Some(Arc::<str>::from(name));
        self
    }

    pub fn client_hub(&self) -> Arc<ClientHub> {
        self.client_hub.clone()
    }

    pub fn current_module(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    /// Deserialize the module's config into `T`. A missing section (or an
    /// unscoped context) yields `T::default()`; a malformed one is an error.
    pub fn module_config<T: DeserializeOwned + Default>(&self) -> anyhow::Result<T> {
        let (Some(name), Some(p)) = (&self.module_name, &self.config_provider) else {
            return Ok(T::default());
        };
        match p.get_module_config(name) {
            None => Ok(T::default()),
            Some(val) => serde_json::from_value(val.clone())
                .map_err(|e| anyhow::anyhow!("invalid {name} config: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Cfg {
        #[serde(default)]
        limit: u32,
    }

    struct MapProvider(HashMap<String, serde_json::Value>);

    impl ConfigProvider for MapProvider {
        fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
            self.0.get(module_name)
        }
    }

    fn ctx_with(name: &str, value: serde_json::Value) -> ModuleCtx {
        let mut map = HashMap::new();
        map.insert(name.to_string(), value);
        ModuleCtxBuilder::new()
            .with_config_provider(Arc::new(MapProvider(map)))
            .build()
    }

    #[test]
    fn reads_scoped_section() {
        let ctx = ctx_with("market", serde_json::json!({ "limit": 7 })).for_module("market");
        assert_eq!(ctx.current_module(), Some("market"));
        assert_eq!(ctx.module_config::<Cfg>().unwrap(), Cfg { limit: 7 });
    }

    #[test]
    fn missing_section_defaults() {
        let ctx = ctx_with("other", serde_json::json!({})).for_module("market");
        assert_eq!(ctx.module_config::<Cfg>().unwrap(), Cfg::default());
    }

    #[test]
    fn malformed_section_is_an_error() {
        let ctx = ctx_with("market", serde_json::json!({ "limit": "many" })).for_module("market");
        assert!(ctx.module_config::<Cfg>().is_err());
    }
}
