//! Razer device inventory CLI
//!
//! Without a subcommand, prints the number of connected Razer devices and
//! details of every keypad.

use clap::{Parser, Subcommand};
use razer_inventory::config::{DEFAULT_CATEGORY, DEFAULT_SYSFS_ROOT};
use razer_inventory::{write_inventory, Backend, Config, DeviceManager, Error, Translations};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "razer-inventory")]
#[command(author, version, about = "List connected Razer devices and their key translations")]
#[command(propagate_version = true)]
struct Cli {
    /// Registry backend (sysfs, usb)
    #[arg(long, global = true, env = "RAZER_BACKEND", default_value = "sysfs")]
    backend: Backend,

    /// Directory where the Razer kernel drivers bind devices
    #[arg(long, global = true, env = "RAZER_SYSFS_ROOT", default_value = DEFAULT_SYSFS_ROOT)]
    sysfs_root: PathBuf,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the device count and details of one category (default)
    #[command(visible_alias = "ls")]
    List {
        /// Category shown in detail
        #[arg(long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },

    /// Print the key translations of a device
    Bindings {
        /// Device serial number
        serial: String,
    },

    /// Replace the key translations of a device
    Bind {
        /// Device serial number
        serial: String,
        /// Key code pairs, decimal or 0x-prefixed hex
        #[arg(required = true, value_name = "FROM:TO")]
        bindings: Vec<String>,
    },

    /// Restore the default key bindings of a device
    Unbind {
        /// Device serial number
        serial: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("{:?}", err);
            eprintln!("razer-inventory: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> razer_inventory::Result<()> {
    let config = Config {
        backend: cli.backend,
        sysfs_root: cli.sysfs_root,
        ..Config::default()
    };
    let command = cli.command.unwrap_or(Commands::List {
        category: config.category.clone(),
    });

    let manager = DeviceManager::connect(&config)?;
    info!("Using {} registry", manager.backend());

    match command {
        Commands::List { category } => {
            let mut out = io::stdout().lock();
            let inventory = write_inventory(&manager, &category, &mut out)?;
            info!(
                "{} of {} devices are {}",
                inventory.matched, inventory.total, category
            );
        }
        Commands::Bindings { serial } => {
            let (_, device) = manager.find_by_serial(&serial)?;
            writeln!(io::stdout(), "{}", device.translations).map_err(Error::Output)?;
        }
        Commands::Bind { serial, bindings } => {
            let translations = Translations::parse_pairs(&bindings)?;
            let (id, device) = manager.find_by_serial(&serial)?;
            manager.set_translations(&id, &translations)?;
            info!("{}: {} bindings written", device.name, translations.len());
        }
        Commands::Unbind { serial } => {
            let (id, device) = manager.find_by_serial(&serial)?;
            manager.clear_translations(&id)?;
            info!("{}: default bindings restored", device.name);
        }
    }

    Ok(())
}
