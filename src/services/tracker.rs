use crate::config::Config;
use crate::domain::storage::Storage;
use crate::error::{Result, WtnError};
use crate::infrastructure::{Selectors, WebDriverSession, WtnWidgetScraper};
use crate::services::correction::{CorrectionReport, CorrectionRule, CorrectionService};
use crate::services::ingestion::{IngestionService, IngestionSettings, IngestionSummary};
use crate::services::ledger::LedgerStore;
use crate::services::report::{FormatFilter, RankOrder, ReportService};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::{info, warn};

pub struct TrackerService {
    config: Config,
    store: Arc<dyn Storage>,
}

impl TrackerService {
    pub fn new(config: Config, store: Arc<dyn Storage + 'static>) -> Self {
        Self { config, store }
    }

    pub async fn scrape(&self) -> Result<IngestionSummary> {
        info!("Reading profile links...");
        let profiles = self.store.load_profiles()?;
        let mut ledger = LedgerStore::load(self.store.clone())?;
        let scraper = WtnWidgetScraper::new(Selectors::new(&self.config.tracker.widget)?);

        info!("Setting up web driver...");
        let session = WebDriverSession::open(&self.config.args.webdriver_url, &self.config.tracker).await?;

        let mut ingestion = IngestionService::new(
            session,
            scraper,
            IngestionSettings::from_config(&self.config.tracker),
        )
        .with_progress(progress_bar(profiles.len() as u64));

        let outcome = ingestion
            .run(&profiles, &mut ledger, Local::now().date_naive())
            .await;

        // The browser goes down whatever happened above.
        if let Err(e) = ingestion.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }

        let summary = outcome?;
        info!("Scraping complete! Results appended to {:?}", self.config.ratings_path());
        info!("Total profiles scraped: {}", summary.profiles_scraped);
        info!("Profiles without a widget: {}", summary.no_content);
        info!("Profiles that failed: {}", summary.failures);
        info!("New doubles ratings added: {}", summary.doubles_added);
        info!("New singles ratings added: {}", summary.singles_added);
        info!("Total records in ledger: {}", ledger.read_all().len());

        Ok(summary)
    }

    pub fn clean(&self, rule: CorrectionRule) -> Result<CorrectionReport> {
        info!(
            "Removing {} rows dated {} where a real rating exists",
            rule.bad_value, rule.bad_date
        );
        CorrectionService::new(rule).apply(self.store.as_ref())
    }

    pub fn report(
        &self,
        format: FormatFilter,
        order: RankOrder,
        limit: usize,
        player: Option<&str>,
    ) -> Result<()> {
        let ledger = LedgerStore::load(self.store.clone())?;
        let report = ReportService::new(ledger.read_all());

        if let Some(name) = player {
            let history = report.player_history(name, format);
            if history.is_empty() {
                info!("No ratings recorded for {}", name);
            }
            for record in history {
                info!("{} {} {} ({})", record.date, record.format, display_rating(record.rating), record.confidence);
            }
            return Ok(());
        }

        let snapshot = report.latest_snapshot(format);
        let Some(date) = snapshot.date else {
            info!("Ledger is empty");
            return Ok(());
        };

        info!("Latest date: {}", date);
        info!("Total players: {}", snapshot.players);
        info!("Average rating: {}", display_rating(snapshot.mean));
        info!(
            "Rating range: {} - {}",
            display_rating(snapshot.min),
            display_rating(snapshot.max)
        );

        info!("Top {} players by rating ({:?}):", limit, order);
        for (rank, record) in report.leaderboard(format, order, limit).iter().enumerate() {
            info!(
                "{:>3}. {} {} {} ({})",
                rank + 1,
                record.name,
                record.format,
                display_rating(record.rating),
                record.confidence
            );
        }

        let profiles = match self.store.load_profiles() {
            Ok(profiles) => profiles,
            Err(WtnError::MissingInput(path)) => {
                info!("No profile links at {:?}, skipping the profile overview", path);
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        let overview = report.profile_overview(&profiles);
        let unrated = overview
            .iter()
            .filter(|o| o.singles.is_none() && o.doubles.is_none())
            .count();
        info!("Total players tracked: {} ({} without a rating yet)", profiles.len(), unrated);

        Ok(())
    }
}

fn display_rating(rating: Option<f64>) -> String {
    rating
        .map(|r| format!("{r:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    match ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}") {
        Ok(style) => pb.set_style(style),
        Err(e) => warn!("Falling back to the default progress style: {}", e),
    }
    pb
}
