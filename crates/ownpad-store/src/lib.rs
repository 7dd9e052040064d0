pub mod factory;
pub mod memory;
pub mod provider;
pub mod sqlite;

#[cfg(feature = "redis")]
pub mod redis;

pub use factory::create_record_store;
pub use memory::MemoryRecordStore;
pub use provider::RecordStore;
pub use sqlite::SqliteRecordStore;
