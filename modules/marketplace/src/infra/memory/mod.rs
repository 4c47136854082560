//! In-memory backend: every port served from process-local tables.
//! Used for the demo mode and as the test double for the service.

mod backend;
mod seed;

pub use backend::MemoryBackend;
pub use seed::seed_demo_data;
