pub mod analytics;
pub mod cli;
pub mod error;
pub mod ingest;
pub mod models;
pub mod report;
pub mod settings;
pub mod utils;

use clap::Parser;

pub use analytics::AnalyticsConfig;
pub use error::{AnalyticsError, Result};
pub use ingest::{batch_from_value, parse_batch, Batch};
pub use models::{Activity, Emotion, EmotionEntry};
pub use report::{build_report, DashboardReport};

const ENABLE_LOGS: bool = true;

pub fn run() {
    // Initialize logging (reads RUST_LOG env var); logs go to stderr so
    // stdout stays pure JSON.
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = cli::Cli::parse();
    if let Err(err) = cli::execute(cli) {
        crate::log_error!("{:#}", err);
        std::process::exit(1);
    }
}
