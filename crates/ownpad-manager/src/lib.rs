pub mod cache;
pub mod manager;

pub use cache::HandleCache;
pub use manager::StorageManager;
