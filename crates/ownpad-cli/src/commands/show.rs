use anyhow::Result;
use std::path::Path;

use ownpad_core::config::OwnpadConfig;
use ownpad_core::{Record, codec};
use ownpad_store::create_record_store;

pub async fn run(base_dir: &Path, name: &str) -> Result<()> {
    let config = OwnpadConfig::load(&OwnpadConfig::default_path(base_dir))?;
    let store = create_record_store(&config).await?;
    let key = codec::encode(name)?;

    let Some(raw) = store.get(&key).await? else {
        println!("No record for {name} (key {key}).");
        println!("Run `ownpad register {name} ...` to create one.");
        return Ok(());
    };
    let record = Record::from_json(&raw)?;
    let params = record.connection_params(&config.ownpad.category);

    println!("Record for {name}:");
    println!("  Key:       {key}");
    println!("  Template:  {}", record.storage_info.template);
    if let Some(ref back_door) = record.storage_info.back_door {
        println!("  Backdoor:  {back_door}");
    }
    println!("  API:       {}", record.storage_info.api);
    println!("  Token:     [REDACTED]");
    println!("  Address:   {}", params.storage_address);

    Ok(())
}
