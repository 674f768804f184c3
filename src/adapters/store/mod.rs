//! Session Store Adapters.
//!
//! Implementations of the `SessionStore` port.
//!
//! ## Available Adapters
//!
//! - `InMemorySessionStore` - HashMap-backed store for testing and development
//! - `RetryingSessionStore` - Wrapper that retries conflicted saves

mod in_memory;
mod retry;

pub use in_memory::InMemorySessionStore;
pub use retry::RetryingSessionStore;
