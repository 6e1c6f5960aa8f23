#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cabinet_config::config::{Config, ConfigStore, FileSource, default_config_path};

#[derive(Parser)]
#[command(name = "cabinet-config")]
#[command(version)]
#[command(about = "Validate and inspect arcade cabinet configuration", long_about = None)]
struct Cli {
    /// Configuration file (defaults to <config dir>/cabinet-config/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the configuration and report whether it is valid
    Check,
    /// Print the validated configuration as JSON
    Show,
    /// List the key bound to each cabinet input
    Keys,
    /// Write a template configuration to edit
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let path = cli.config.unwrap_or_else(default_config_path);

    match cli.command {
        Command::Check => {
            let store = load(&path)?;
            let config = store.get();
            println!(
                "OK: serial={} pcb_id={} server={} auth={}",
                config.serial, config.pcb_id, config.server_address, config.auth_server_ip
            );
        }
        Command::Show => {
            let store = load(&path)?;
            let json = serde_json::to_string_pretty(store.get())
                .context("Failed to serialize config")?;
            println!("{}", json);
        }
        Command::Keys => {
            let store = load(&path)?;
            let key_bind = &store.get().key_bind;
            for (role, code) in key_bind.iter() {
                println!(
                    "{:<16} {:<14} {}",
                    role.label(),
                    code.display_name(),
                    code.evdev_name().unwrap_or_default()
                );
            }
            for (code, roles) in key_bind.duplicates() {
                let labels: Vec<&str> = roles.iter().map(|r| r.label()).collect();
                println!("shared: {} -> {}", code.display_name(), labels.join(", "));
            }
        }
        Command::Init { force } => {
            if path.exists() && !force {
                bail!("{:?} already exists, pass --force to overwrite", path);
            }
            Config::template()
                .and_then(|config| config.save(&path))
                .with_context(|| format!("Failed to write template config to {:?}", path))?;
            println!("Wrote template config to {}", path.display());
        }
    }

    Ok(())
}

/// Load the configuration or abort startup with the offending field
fn load(path: &Path) -> Result<ConfigStore> {
    let mut store = ConfigStore::new();
    store
        .load(&FileSource::new(path))
        .with_context(|| format!("Invalid configuration in {:?}", path))?;
    Ok(store)
}
