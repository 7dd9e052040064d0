use anyhow::Result;
use std::path::Path;

use ownpad_core::config::OwnpadConfig;

pub fn run(base_dir: &Path) -> Result<()> {
    let config_path = OwnpadConfig::default_path(base_dir);
    let config = OwnpadConfig::load(&config_path)?;

    println!("Config: {}", config_path.display());
    println!();
    println!("  Record store:   {}", config.ownpad.record_store);
    println!("  DB path:        {}", config.ownpad.db_path);
    println!("  Category:       {}", config.ownpad.category);
    match config.ownpad.supported_apis {
        Some(ref apis) => println!("  Storage APIs:   {}", apis.join(", ")),
        None => println!("  Storage APIs:   any"),
    }

    match config.redis {
        Some(ref redis) => {
            println!();
            println!("  Redis:");
            println!("    Host:         {}", redis.host);
            println!("    Port:         {}", redis.port);
            println!(
                "    Password:     {}",
                if redis.password.is_some() { "set" } else { "none" }
            );
        }
        None if config.ownpad.record_store == "redis" => {
            println!();
            println!("  No [redis] table; using 127.0.0.1:6379 without password.");
        }
        None => {}
    }

    Ok(())
}
