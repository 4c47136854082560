// === PUBLIC CONTRACT ===
pub mod contract;

pub use contract::{client, error, model};

// === SESSION STORE ===
// The context object front-ends render from and send intents to.
pub mod session;

// === MODULE DEFINITION ===
pub mod module;
pub use module::Marketplace;

// === INTERNAL MODULES ===
// Exposed for tests and wiring; front-ends should stick to `contract` and `session`.
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
