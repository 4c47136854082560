//! # ModKit - module wiring for Trueque
//!
//! Small toolkit shared by the binary and the feature modules:
//!
//! - [`ClientHub`]: type-keyed registry where modules publish their client
//!   traits and front-ends look them up (`hub.get::<dyn my::Api>()`).
//! - [`ModuleCtx`] / [`Module`]: explicit init context carrying module
//!   configuration and the hub, instead of ambient globals.
//! - [`TracedClient`]: outgoing HTTP with a span per request and W3C
//!   `traceparent` propagation.

pub use anyhow::Result;
pub use async_trait::async_trait;

pub mod client_hub;
pub mod context;
pub mod contracts;
pub mod http;

pub use client_hub::{ClientHub, ClientHubError};
pub use context::{ConfigProvider, ModuleCtx, ModuleCtxBuilder};
pub use contracts::Module;
pub use http::client::TracedClient;
