use serde::{Deserialize, Serialize};

use crate::domain::contact::ContactTemplate;
use crate::domain::service::ServiceConfig;

/// Marketplace module configuration (`modules.marketplace` section).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MarketplaceConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default = "default_signup_points")]
    pub signup_points: i64,
    #[serde(default)]
    pub contact: ContactConfig,
    /// Populate the in-memory backend with demo members and offers.
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            signup_points: default_signup_points(),
            contact: ContactConfig::default(),
            seed_demo_data: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    #[default]
    Memory,
    Remote,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    #[serde(default)]
    pub mode: BackendMode,
    /// Project URL of the hosted backend, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_bucket")]
    pub image_bucket: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            mode: BackendMode::default(),
            url: String::new(),
            anon_key: String::new(),
            image_bucket: default_bucket(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContactConfig {
    #[serde(default = "default_contact_url")]
    pub base_url: String,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Greeting sent to the owner; `{title}` and `{app}` are substituted.
    #[serde(default = "default_message")]
    pub message: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        let template = ContactTemplate::default();
        Self {
            base_url: template.base_url,
            app_name: template.app_name,
            message: template.message,
        }
    }
}

impl From<&ContactConfig> for ContactTemplate {
    fn from(cfg: &ContactConfig) -> Self {
        Self {
            base_url: cfg.base_url.clone(),
            app_name: cfg.app_name.clone(),
            message: cfg.message.clone(),
        }
    }
}

impl MarketplaceConfig {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            signup_points: self.signup_points,
            contact: ContactTemplate::from(&self.contact),
            ..ServiceConfig::default()
        }
    }
}

fn default_signup_points() -> i64 {
    100
}

fn default_true() -> bool {
    true
}

fn default_bucket() -> String {
    "offers".to_string()
}

fn default_contact_url() -> String {
    ContactTemplate::default().base_url
}

fn default_app_name() -> String {
    ContactTemplate::default().app_name
}

fn default_message() -> String {
    ContactTemplate::default().message
}
