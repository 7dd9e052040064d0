//! Factory for creating the appropriate RecordStore based on configuration.

use std::path::Path;

use ownpad_core::config::OwnpadConfig;
use ownpad_core::{OwnpadError, Result};

use crate::memory::MemoryRecordStore;
use crate::provider::RecordStore;
use crate::sqlite::SqliteRecordStore;

/// Create a RecordStore based on `ownpad.record_store` in the config.
///
/// Supported types:
/// - `"sqlite"`: local SQLite file at `ownpad.db_path`
/// - `"memory"`: process-local, lost on exit
/// - `"redis"`: redis server from the `[redis]` table (compile with `redis` feature)
pub async fn create_record_store(config: &OwnpadConfig) -> Result<Box<dyn RecordStore>> {
    match config.ownpad.record_store.as_str() {
        "sqlite" => {
            let store = SqliteRecordStore::open(Path::new(&config.ownpad.db_path))?;
            Ok(Box::new(store))
        }

        "memory" => Ok(Box::new(MemoryRecordStore::new())),

        #[cfg(feature = "redis")]
        "redis" => {
            let redis = config.redis.clone().unwrap_or_default();
            let store = crate::redis::RedisRecordStore::connect(&redis).await?;
            Ok(Box::new(store))
        }

        #[cfg(not(feature = "redis"))]
        "redis" => Err(OwnpadError::Config(
            "redis feature not enabled. Recompile with --features redis".to_string(),
        )),

        other => Err(OwnpadError::Config(format!(
            "Unknown record store type: {other}"
        ))),
    }
}
