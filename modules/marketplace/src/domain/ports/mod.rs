pub mod auth;
pub mod storage;

pub use auth::{AuthError, AuthIdentity, AuthPort};
pub use storage::ImageStore;

/// Output port: publish domain events (no knowledge of transport).
pub trait EventPublisher<E>: Send + Sync + 'static {
    fn publish(&self, event: &E);
}
