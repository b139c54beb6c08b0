use crate::services::correction::KeyColumn;
use crate::services::report::{FormatFilter, RankOrder};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Path to the tracker configuration file (optional)
    #[arg(long, default_value = "wtn_config.json")]
    pub config_file: PathBuf,

    /// Directory holding the profile links and ratings tables
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Profile links table (defaults to <data-dir>/wtn_profile_links.csv)
    #[arg(long)]
    pub profiles_file: Option<PathBuf>,

    /// Ratings ledger (defaults to <data-dir>/wtn_ratings.csv)
    #[arg(long)]
    pub ratings_file: Option<PathBuf>,

    /// WebDriver endpoint, e.g. a local chromedriver
    #[arg(long, env = "WEBDRIVER_URL", default_value = "http://localhost:9515")]
    pub webdriver_url: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Scrape every profile and append the ratings found to the ledger
    Scrape,
    /// Remove sentinel rows left by a faulty scrape where a real value exists
    Clean {
        /// Date the faulty run wrote its rows under
        #[arg(long, default_value = "2026-01-28")]
        bad_date: NaiveDate,

        /// The bogus rating the faulty run wrote
        #[arg(long, default_value_t = 34.21)]
        bad_value: f64,

        /// Columns that identify duplicate rows
        #[arg(long, value_enum, value_delimiter = ',', default_values = ["name", "date", "format"])]
        key: Vec<KeyColumn>,
    },
    /// Summarise the ledger: current ratings and a leaderboard
    Report {
        #[arg(long, value_enum, default_value = "both")]
        format: FormatFilter,

        /// Sort the leaderboard by highest or lowest rating
        #[arg(long, value_enum, default_value = "highest")]
        order: RankOrder,

        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Show the rating history of one player instead
        #[arg(long)]
        player: Option<String>,
    },
}
