use async_trait::async_trait;
use ownpad_core::config::RedisConfig;
use ownpad_core::{OwnpadError, Result};
use ::redis::AsyncCommands;
use ::redis::aio::ConnectionManager;

use crate::provider::RecordStore;

/// Redis-backed record store. One `GET`/`SET` per record.
pub struct RedisRecordStore {
    conn: ConnectionManager,
}

fn redis_err(e: ::redis::RedisError) -> OwnpadError {
    OwnpadError::Persistence(format!("redis: {e}"))
}

impl RedisRecordStore {
    /// Connect using host, port and password from the config.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = ::redis::Client::open(config.url()).map_err(redis_err)?;
        let conn = ConnectionManager::new(client).await.map_err(redis_err)?;
        tracing::info!("Connected to redis record store at {}:{}", config.host, config.port);
        Ok(Self { conn })
    }
}

#[async_trait]
impl RecordStore for RedisRecordStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key).await.map_err(redis_err)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await.map_err(redis_err)
    }

    fn name(&self) -> &str {
        "redis"
    }
}
