//! gas-tracker: samples the Etherscan gas oracle once per invocation and
//! e-mails when the price leaves its usual band.
//!
//! Run hourly from cron with `RUST_LOG=info gas-tracker run`.

mod dynamo;
mod email;
mod etherscan;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gas_core::config::tracker_config::{ConfigMode, StoreLocation, TrackerConfig};
use gas_core::store::{legacy::read_legacy_file, open_file_store, TableStore};
use gas_core::traits::notifier::{LogNotifier, Notifier};
use gas_core::traits::price_source::{FixedPrice, PriceSource};
use gas_core::traits::store::Store;
use gas_core::tracker::gas_tracker::snapshot;
use gas_core::{GasTracker, HistoryWindow};

use dynamo::DynamoTable;
use email::EmailNotifier;
use etherscan::EtherscanSource;

#[derive(Parser)]
#[command(name = "gas-tracker")]
#[command(version, about = "Track Ethereum gas prices and alert on band changes")]
struct Cli {
    /// History location, overrides GAS_TRACKER_STORE: a file (`.csv` selects
    /// the CSV layout) or `dynamodb:<table>`
    #[arg(long, global = true)]
    store: Option<StoreLocation>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the current price, classify it and record it
    Run {
        /// Log notifications instead of sending e-mail
        #[arg(long)]
        dry_run: bool,

        /// Use this price instead of asking Etherscan
        #[arg(long)]
        price: Option<u64>,
    },
    /// Print the stored history and its statistics
    Show,
    /// Convert a history file in the old single-category layout and write it
    /// to the configured store, file or table
    Migrate {
        /// Old history file
        #[arg(long)]
        from: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Run {
        dry_run: false,
        price: None,
    }) {
        Command::Run { dry_run, price } => run(cli.store, dry_run, price),
        Command::Show => show(cli.store),
        Command::Migrate { from } => migrate(cli.store, from),
    }
}

fn load_config(mode: ConfigMode, store: Option<StoreLocation>) -> Result<TrackerConfig> {
    let mut config = TrackerConfig::from_env(mode).context("while reading configuration")?;
    if let Some(location) = store {
        config.store = location;
    }
    Ok(config)
}

/// Only fetching needs the API key and only sending mail needs the SMTP
/// settings.
fn run_mode(dry_run: bool, price: Option<u64>) -> ConfigMode {
    match (dry_run, price) {
        (true, Some(_)) => ConfigMode::Offline,
        (true, None) => ConfigMode::DryRun,
        (false, Some(_)) => ConfigMode::ManualPrice,
        (false, None) => ConfigMode::Live,
    }
}

fn open_store(location: &StoreLocation) -> Result<Box<dyn Store>> {
    let store: Box<dyn Store> = match location {
        StoreLocation::File(path) => open_file_store(path),
        StoreLocation::Table(name) => Box::new(TableStore::new(
            DynamoTable::connect(name)
                .with_context(|| format!("while connecting to table {}", name))?,
        )),
    };
    Ok(store)
}

fn run(store: Option<StoreLocation>, dry_run: bool, price: Option<u64>) -> Result<()> {
    let config = load_config(run_mode(dry_run, price), store)?;

    let notifier: Box<dyn Notifier> = match &config.email {
        Some(email) => {
            Box::new(EmailNotifier::new(email).context("while constructing email notifier")?)
        }
        None => Box::new(LogNotifier),
    };

    let source: Box<dyn PriceSource> = match (price, &config.api_key) {
        (Some(price), _) => Box::new(FixedPrice(price)),
        (None, Some(key)) => Box::new(EtherscanSource::new(key.clone())?),
        (None, None) => anyhow::bail!("ETHERSCAN_API_KEY is not set"),
    };

    info!("using history at {}", config.store);
    let tracker = GasTracker::new(
        source,
        open_store(&config.store)?,
        notifier,
        config.history_len,
    );

    let report = tracker
        .run_cycle()
        .context("while running gas price cycle")?;
    match report.statistics {
        Some(stats) => info!(
            "gas {} is {} ({}), {} records kept",
            report.price, report.category, stats, report.window_len
        ),
        None => info!(
            "gas {} recorded as the first sample, {} records kept",
            report.price, report.window_len
        ),
    }
    Ok(())
}

fn show(store: Option<StoreLocation>) -> Result<()> {
    let config = load_config(ConfigMode::Offline, store)?;
    let store = open_store(&config.store)?;
    let (window, stats) = snapshot(store.as_ref(), config.history_len)
        .with_context(|| format!("while reading {}", config.store))?;

    for sample in window.samples_by_time() {
        println!(
            "{}  {:>6}  {}",
            sample.timestamp().format("%Y-%m-%d %H:%M:%S"),
            sample.price(),
            sample.category()
        );
    }
    match stats {
        Some(stats) => println!(
            "{} of {} records, {}, average band [{:.3}, {:.3}]",
            window.len(),
            window.capacity(),
            stats,
            stats.lower(),
            stats.upper()
        ),
        None => println!("no history yet"),
    }
    Ok(())
}

fn migrate(store: Option<StoreLocation>, from: PathBuf) -> Result<()> {
    let config = load_config(ConfigMode::Offline, store)?;
    let samples = read_legacy_file(&from)
        .with_context(|| format!("while reading legacy history {}", from.display()))?;
    let count = samples.len();

    let window = HistoryWindow::from_samples(samples, config.history_len);
    let target = open_store(&config.store)?;
    target
        .save(&window)
        .with_context(|| format!("while writing {}", config.store))?;

    info!(
        "migrated {} records ({} kept) from {} to {}",
        count,
        window.len(),
        from.display(),
        config.store
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_mode_follows_what_the_run_touches() {
        assert_eq!(run_mode(false, None), ConfigMode::Live);
        assert_eq!(run_mode(true, None), ConfigMode::DryRun);
        assert_eq!(run_mode(true, Some(30)), ConfigMode::Offline);
        assert_eq!(run_mode(false, Some(30)), ConfigMode::ManualPrice);
    }

    #[test]
    fn test_store_flag() {
        let cli = Cli::try_parse_from(["gas-tracker", "show", "--store", "dynamodb:gasPrices"])
            .unwrap();
        assert_eq!(
            cli.store,
            Some(StoreLocation::Table("gasPrices".to_string()))
        );

        let cli = Cli::try_parse_from([
            "gas-tracker",
            "--store",
            "/tmp/gas.csv",
            "migrate",
            "--from",
            "old.json",
        ])
        .unwrap();
        assert_eq!(
            cli.store,
            Some(StoreLocation::File(PathBuf::from("/tmp/gas.csv")))
        );
    }
}
