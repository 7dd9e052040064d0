use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use ownpad_core::BearerToken;
use ownpad_core::config::OwnpadConfig;
use ownpad_manager::StorageManager;
use ownpad_remote::BearerRemoteStorage;

pub async fn run(base_dir: &Path, name: &str, token: Option<&str>) -> Result<()> {
    let config = OwnpadConfig::load(&OwnpadConfig::default_path(base_dir))?;
    let remote = Arc::new(BearerRemoteStorage::from_settings(&config.ownpad));
    let manager = StorageManager::from_config(&config, remote).await?;

    let handle = manager.get(name).await?;
    println!("Storage {name}:");
    println!("  Address:  {}", handle.params.storage_address);
    println!("  API:      {}", handle.params.storage_api);
    println!("  Status:   {}", handle.status);
    println!("  Opened:   {}", handle.created_at);

    if let Some(token) = token {
        let ok = manager.authenticate(name, &BearerToken::new(token)).await?;
        if ok {
            println!("  Token:    accepted");
        } else {
            println!("  Token:    rejected");
            anyhow::bail!("bearer token rejected for {name}");
        }
    }

    Ok(())
}
