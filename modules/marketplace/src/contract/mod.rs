pub mod client;
pub mod error;
pub mod model;

pub use client::MarketplaceApi;
pub use error::MarketplaceError;
pub use model::*;
