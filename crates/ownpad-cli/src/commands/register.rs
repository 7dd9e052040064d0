use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use ownpad_core::config::OwnpadConfig;
use ownpad_core::{BearerToken, StorageInfo, codec};
use ownpad_manager::StorageManager;
use ownpad_remote::BearerRemoteStorage;

pub async fn run(
    base_dir: &Path,
    name: &str,
    template: &str,
    api: &str,
    token: &str,
    backdoor: Option<&str>,
) -> Result<()> {
    let config = OwnpadConfig::load(&OwnpadConfig::default_path(base_dir))?;
    let remote = Arc::new(BearerRemoteStorage::from_settings(&config.ownpad));
    let manager = StorageManager::from_config(&config, remote).await?;

    let mut info = StorageInfo::new(template, api);
    if let Some(address) = backdoor {
        info = info.with_back_door(address);
    }

    let status = manager.set(name, info, BearerToken::new(token)).await?;
    let handle = manager.get(name).await?;

    println!("Registered {name}");
    println!("  Key:      {}", codec::encode(name)?);
    println!("  Address:  {}", handle.params.storage_address);
    println!("  API:      {}", handle.params.storage_api);
    println!("  Status:   {status}");

    Ok(())
}
