//! External service interactions
//!
//! - Record store boundary and parallel snapshot fetch
//! - Hosted (PostgREST) and in-memory store implementations
//! - Background refresh execution

pub mod memory;
pub mod refresh;
pub mod rest;
pub mod store;

pub use memory::MemoryStore;
pub use refresh::RefreshWorker;
pub use rest::RestStore;
pub use store::RecordStore;
