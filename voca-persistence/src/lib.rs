pub mod connection;
pub mod entities;
pub mod repositories;
pub mod store;
pub mod write_queue;

pub use store::{MemoryStore, PersistentStore};
pub use write_queue::WriteQueue;
