use crate::config::cli::{Args, Command};
use crate::domain::StorageKeys;
use crate::error::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub mod cli;

/// CSS class names of the rating widget on a profile page.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WidgetClasses {
    pub section: String,
    pub title: String,
    pub value: String,
    pub confidence: String,
    pub subtitle: String,
}

impl Default for WidgetClasses {
    fn default() -> Self {
        Self {
            section: "v-form-wtn-widget__section".to_string(),
            title: "v-form-wtn-widget__section-title".to_string(),
            value: "v-form-wtn-widget__section-value".to_string(),
            confidence: "v-form-wtn-widget__section-confidence".to_string(),
            subtitle: "v-form-wtn-widget__section-subtitle".to_string(),
        }
    }
}

impl WidgetClasses {
    /// CSS selector of the element whose presence means the widget rendered.
    pub fn marker_css(&self) -> String {
        format!(".{}", self.section)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub widget: WidgetClasses,
    pub marker_timeout_secs: u64,
    pub settle_delay_ms: u64,
    pub blank_delay_ms: u64,
    pub politeness_delay_ms: u64,
    pub checkpoint_interval: usize,
    pub user_agent: String,
    pub headless: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            widget: WidgetClasses::default(),
            marker_timeout_secs: 15,
            settle_delay_ms: 2000,
            blank_delay_ms: 500,
            politeness_delay_ms: 2000,
            checkpoint_interval: 10,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            headless: true,
        }
    }
}

impl TrackerConfig {
    pub fn marker_timeout(&self) -> Duration {
        Duration::from_secs(self.marker_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn blank_delay(&self) -> Duration {
        Duration::from_millis(self.blank_delay_ms)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }
}

pub struct Config {
    pub args: Args,
    pub tracker: TrackerConfig,
}

impl Config {
    pub fn new(args: Args) -> Result<Self> {
        let tracker = if args.config_file.exists() {
            info!("Loading tracker config from {:?}", args.config_file);
            serde_json::from_str(&std::fs::read_to_string(&args.config_file)?)?
        } else {
            info!("No config file at {:?}, using defaults", args.config_file);
            TrackerConfig::default()
        };

        Ok(Self { args, tracker })
    }

    pub fn command(&self) -> Command {
        self.args.command.clone().unwrap_or(Command::Scrape)
    }

    pub fn profiles_path(&self) -> PathBuf {
        self.args
            .profiles_file
            .clone()
            .unwrap_or_else(|| self.args.data_dir.join(StorageKeys::PROFILES_FILE))
    }

    pub fn ratings_path(&self) -> PathBuf {
        self.args
            .ratings_file
            .clone()
            .unwrap_or_else(|| self.args.data_dir.join(StorageKeys::RATINGS_FILE))
    }

    pub fn ensure_directories(&self) -> Result<()> {
        if !self.args.data_dir.exists() {
            std::fs::create_dir_all(&self.args.data_dir)?;
        }

        info!("Data dir exists");
        Ok(())
    }
}
