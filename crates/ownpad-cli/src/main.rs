mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ownpad")]
#[command(about = "Remote storage registry for pads")]
#[command(version)]
struct Cli {
    /// Path to the ownpad config directory (default: ~/.ownpad)
    #[arg(long, global = true, env = "OWNPAD_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize ownpad configuration and record store
    Init,

    /// Show the record store key for a storage name
    Encode {
        /// Storage name, e.g. alice-at-example-dot-org
        name: String,
    },

    /// Show the storage name for a record store key
    Decode {
        /// Record store key, e.g. alice@example.org
        key: String,
    },

    /// Open a storage and persist its record
    Register {
        /// Storage name
        name: String,
        /// Address template containing {category}
        #[arg(long)]
        template: String,
        /// Storage API tag
        #[arg(long, default_value = "simple")]
        api: String,
        /// Bearer token (or set OWNPAD_BEARER_TOKEN env var)
        #[arg(long, env = "OWNPAD_BEARER_TOKEN")]
        token: String,
        /// Direct address that bypasses the template
        #[arg(long)]
        backdoor: Option<String>,
    },

    /// Show the persisted record for a storage name
    Show {
        /// Storage name
        name: String,
    },

    /// Reload a storage from its record and optionally verify a token
    Check {
        /// Storage name
        name: String,
        /// Bearer token to verify against the storage
        #[arg(long, env = "OWNPAD_BEARER_TOKEN")]
        token: Option<String>,
    },

    /// Show current configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    let directive: tracing_subscriber::filter::Directive = "ownpad=info".parse()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .init();

    let cli = Cli::parse();

    let base_dir = match cli.config_dir {
        Some(ref dir) => dir.clone(),
        None => ownpad_core::config::OwnpadConfig::default_base_dir()?,
    };

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Init => rt.block_on(commands::init::run(&base_dir)),
        Commands::Encode { ref name } => commands::codec::encode(name),
        Commands::Decode { ref key } => commands::codec::decode(key),
        Commands::Register {
            ref name,
            ref template,
            ref api,
            ref token,
            ref backdoor,
        } => rt.block_on(commands::register::run(
            &base_dir,
            name,
            template,
            api,
            token,
            backdoor.as_deref(),
        )),
        Commands::Show { ref name } => rt.block_on(commands::show::run(&base_dir, name)),
        Commands::Check {
            ref name,
            ref token,
        } => rt.block_on(commands::check::run(&base_dir, name, token.as_deref())),
        Commands::Config => commands::config::run(&base_dir),
    }
}
