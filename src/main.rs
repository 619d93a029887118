#![forbid(unsafe_code)]

mod color;
mod config;
mod constants;
mod keyfile;
mod keysym;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use config::{schema, Config, ConfigLoadError};
use constants::{logging, paths};

/// Minimal LightDM greeter configuration
#[derive(Debug, Parser)]
#[command(name = "mini-greeter", version)]
struct Cli {
    /// Load and validate the configuration file, then exit
    #[arg(long, conflicts_with_all = ["dump", "dump_defaults"])]
    check: bool,

    /// Print the fully resolved configuration as JSON
    #[arg(long, conflicts_with = "dump_defaults")]
    dump: bool,

    /// Print every known setting with its default as JSON, without reading the file
    #[arg(long)]
    dump_defaults: bool,
}

fn init_tracing() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var(logging::LEVEL_ENV)
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn exit_on_load_error(e: ConfigLoadError) -> ! {
    error!(path = %paths::CONFIG_FILE, error = %e, "Failed to load greeter configuration");
    if let Some(source) = std::error::Error::source(&e) {
        error!(cause = %source, "Caused by");
    }
    std::process::exit(1);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    if cli.dump_defaults {
        println!("{}", serde_json::to_string_pretty(&schema::all())?);
        return Ok(());
    }

    // Any load failure is fatal: the greeter cannot start without its config
    let config = Config::load().unwrap_or_else(|e| exit_on_load_error(e));

    if cli.dump {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else if cli.check {
        info!(path = %paths::CONFIG_FILE, "Configuration is valid");
    } else {
        info!(
            user = %config.login_user,
            mod_mask = u16::from(config.mod_bit.mask()),
            "Greeter configuration ready"
        );
    }

    Ok(())
}
