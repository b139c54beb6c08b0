use clap::Parser;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, Level};
use wtn_tracker::config::cli::{Args, Command};
use wtn_tracker::config::Config;
use wtn_tracker::error::Result;
use wtn_tracker::infrastructure::FileSystemStore;
use wtn_tracker::services::correction::CorrectionRule;
use wtn_tracker::services::tracker::TrackerService;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = Level::from_str(&args.log_level).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = Config::new(args)?;
    config.ensure_directories()?;

    let store = Arc::new(FileSystemStore::new(config.profiles_path(), config.ratings_path()));
    let command = config.command();
    let tracker = TrackerService::new(config, store);

    match command {
        Command::Scrape => {
            tracker.scrape().await?;
        }
        Command::Clean {
            bad_date,
            bad_value,
            key,
        } => {
            let rule = CorrectionRule::new(bad_date, bad_value).with_key(key);
            tracker.clean(rule)?;
        }
        Command::Report {
            format,
            order,
            limit,
            player,
        } => {
            tracker.report(format, order, limit, player.as_deref())?;
        }
    }

    info!("Done");
    Ok(())
}
