pub mod kv_repository;
pub mod progress_repository;

pub use kv_repository::KvRepository;
pub use progress_repository::ProgressRepository;
