//! Hosted backend adapters: REST tables, password auth and object storage,
//! all over one [`BackendClient`].

mod auth;
mod client;
mod repos;
mod rows;
mod storage;

pub use auth::RemoteAuth;
pub use client::{BackendClient, RemoteError};
pub use repos::{RemoteOffersRepository, RemoteRatingsRepository, RemoteUsersRepository};
pub use storage::RemoteImageStore;
