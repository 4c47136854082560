//! Minimalistic, type-safe ClientHub.
//!
//! - Providers register an implementation once (live backend or mock).
//! - Consumers fetch by *interface type* (trait object): `get::<dyn my::Api>()`.
//!
//! Key = type name. `type_name::<T>()` works for `T = dyn Trait`.
//! Value = `Arc<T>` stored as `Box<dyn Any + Send + Sync>` and downcast on read.
//! Re-registering overwrites atomically; Arcs already handed out stay valid.

use parking_lot::RwLock;
use std::{any::Any, collections::HashMap, fmt, sync::Arc};

#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct TypeKey(&'static str);

impl TypeKey {
    #[inline]
    fn of<T: ?Sized + 'static>() -> Self {
        TypeKey(std::any::type_name::<T>())
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientHubError {
    #[error("client not found: type={type_key:?}")]
    NotFound { type_key: TypeKey },

    #[error("type mismatch in hub for type={type_key:?}")]
    TypeMismatch { type_key: TypeKey },
}

type Boxed = Box<dyn Any + Send + Sync>;

/// Type-safe registry of clients keyed by interface type.
#[derive(Default)]
pub struct ClientHub {
    map: RwLock<HashMap<TypeKey, Boxed>>,
}

impl ClientHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client under the interface type `T`.
    pub fn register<T>(&self, client: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.map.write().insert(TypeKey::of::<T>(), Box::new(client));
    }

    /// Fetch a client by interface type `T`.
    pub fn get<T>(&self) -> Result<Arc<T>, ClientHubError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let type_key = TypeKey::of::<T>();
        let r = self.map.read();

        let boxed = r
            .get(&type_key)
            .ok_or(ClientHubError::NotFound { type_key })?;

        boxed
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or(ClientHubError::TypeMismatch { type_key })
    }
}
