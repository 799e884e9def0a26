//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Services depend
//! only on these traits; adapters provide the implementations.

mod clock;
mod storage;
mod user_api;

pub use clock::Clock;
pub use storage::KeyValueStore;
pub use user_api::UserApi;
