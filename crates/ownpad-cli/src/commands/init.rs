use anyhow::Result;
use std::path::Path;

use ownpad_core::config::OwnpadConfig;
use ownpad_store::create_record_store;

pub async fn run(base_dir: &Path) -> Result<()> {
    println!("Initializing ownpad in {}", base_dir.display());

    std::fs::create_dir_all(base_dir)?;

    let config_path = OwnpadConfig::default_path(base_dir);
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
    } else {
        let config = OwnpadConfig::default_config(base_dir);
        config.save(&config_path)?;
        println!("Created config: {}", config_path.display());
    }

    let config = OwnpadConfig::load(&config_path)?;
    let store = create_record_store(&config).await?;
    println!("Initialized record store: {}", store.name());
    if store.name() == "sqlite" {
        println!("  Database: {}", config.ownpad.db_path);
    }

    println!("\nownpad initialized. Next steps:");
    println!("  1. Adjust the record store in {}", config_path.display());
    println!("  2. Run `ownpad register <name> --template <url> --token <token>`");

    Ok(())
}
