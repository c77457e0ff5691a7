//! Delta Exchange strategy runner - main entry point
//!
//! This binary provides two subcommands:
//! - run: Poll candles and trade the configured strategy (paper by default)
//! - signal: One-shot evaluation, prints the decision and bracket

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "delta-strategies")]
#[command(about = "Signal-driven bracket-order trading on Delta Exchange", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the polling trade loop
    Run {
        /// Path to configuration file
        #[arg(short, long, default_value = "configs/btcusd_1m.json")]
        config: String,

        /// Live trading mode (CAUTION - REAL MONEY!). Default is paper.
        #[arg(long)]
        live: bool,

        /// Cycle interval in seconds (overrides config)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Evaluate the strategy once and print the decision
    Signal {
        /// Path to configuration file
        #[arg(short, long, default_value = "configs/btcusd_1m.json")]
        config: String,
    },
}

fn setup_logging(verbose: bool, command_name: &str) -> Result<()> {
    std::fs::create_dir_all("logs")?;

    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    // Filter out noisy external crates
    let level = if verbose { "debug" } else { "info" };
    let filter_str = format!(
        "{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        level
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized");
    info!("Log file: {}", log_path.display());

    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let command_name = match &cli.command {
        Commands::Run { .. } => "run",
        Commands::Signal { .. } => "signal",
    };

    setup_logging(cli.verbose, command_name)?;

    match cli.command {
        Commands::Run {
            config,
            live,
            interval,
        } => commands::run::run(config, live, interval),

        Commands::Signal { config } => commands::signal::run(config),
    }
}
