use crate::config::TrackerConfig;
use crate::domain::{Format, PageLoad, PageRenderer, ProfileLink, RatingRecord, RecordBuilder};
use crate::error::Result;
use crate::infrastructure::WtnWidgetScraper;
use crate::services::ledger::LedgerStore;
use chrono::NaiveDate;
use indicatif::ProgressBar;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct IngestionSettings {
    pub politeness_delay: Duration,
    pub checkpoint_interval: usize,
}

impl IngestionSettings {
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self {
            politeness_delay: config.politeness_delay(),
            checkpoint_interval: config.checkpoint_interval,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionSummary {
    pub profiles_scraped: usize,
    pub no_content: usize,
    pub failures: usize,
    pub doubles_added: usize,
    pub singles_added: usize,
    pub checkpoints: usize,
}

impl IngestionSummary {
    pub fn rows_added(&self) -> usize {
        self.doubles_added + self.singles_added
    }

    fn count(&mut self, records: &[RatingRecord]) {
        for record in records {
            match record.format {
                Format::Doubles => self.doubles_added += 1,
                Format::Singles => self.singles_added += 1,
            }
        }
    }
}

/// Walks the profile list in order, one page at a time, and checkpoints new
/// ratings into the ledger every `checkpoint_interval` profiles.
pub struct IngestionService<R> {
    renderer: R,
    scraper: WtnWidgetScraper,
    settings: IngestionSettings,
    progress: ProgressBar,
}

impl<R: PageRenderer> IngestionService<R> {
    pub fn new(renderer: R, scraper: WtnWidgetScraper, settings: IngestionSettings) -> Self {
        Self {
            renderer,
            scraper,
            settings,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Scrapes every profile. Per-profile failures are logged and counted,
    /// never returned; only a failed final flush is an error.
    pub async fn run(
        &mut self,
        profiles: &[ProfileLink],
        ledger: &mut LedgerStore,
        today: NaiveDate,
    ) -> Result<IngestionSummary> {
        info!("Found {} profiles to scrape", profiles.len());
        self.progress.set_length(profiles.len() as u64);

        let builder = RecordBuilder::new(today);
        let interval = self.settings.checkpoint_interval.max(1);
        let mut summary = IngestionSummary::default();
        let mut batch: Vec<RatingRecord> = Vec::new();

        for (index, profile) in profiles.iter().enumerate() {
            self.progress.set_message(profile.name.clone());
            info!("Scraping profile for {}...", profile.name);

            match self.scrape_profile(profile, &builder).await {
                Ok(Some(records)) => {
                    log_outcome(&records);
                    summary.count(&records);
                    batch.extend(records);
                }
                Ok(None) => {
                    warn!("Timeout waiting for WTN widget to load for {}", profile.name);
                    summary.no_content += 1;
                }
                Err(e) => {
                    warn!("Error scraping profile for {}: {}", profile.name, e);
                    summary.failures += 1;
                }
            }
            summary.profiles_scraped += 1;
            self.progress.inc(1);

            sleep(self.settings.politeness_delay).await;

            if (index + 1) % interval == 0 {
                match flush(ledger, &mut batch) {
                    Ok(()) => {
                        summary.checkpoints += 1;
                        info!("Progress saved: {}/{} profiles scraped", index + 1, profiles.len());
                    }
                    Err(e) => error!(
                        "Checkpoint after {} profiles failed, {} records held for the next one: {}",
                        index + 1,
                        batch.len(),
                        e
                    ),
                }
            }
        }

        flush(ledger, &mut batch)?;
        self.progress.finish_with_message("done");

        Ok(summary)
    }

    /// `Ok(None)` when the page never rendered a rating widget.
    async fn scrape_profile(
        &mut self,
        profile: &ProfileLink,
        builder: &RecordBuilder,
    ) -> Result<Option<Vec<RatingRecord>>> {
        let html = match self.renderer.load(&profile.profile_url).await? {
            PageLoad::Rendered(html) => html,
            PageLoad::NoContent => return Ok(None),
        };

        let extraction = self.scraper.extract(&html);
        Ok(Some(builder.build(profile, &extraction)))
    }

    pub async fn close(self) -> Result<()> {
        self.renderer.close().await
    }
}

/// The batch is only cleared once the ledger write succeeded.
fn flush(ledger: &mut LedgerStore, batch: &mut Vec<RatingRecord>) -> Result<()> {
    if batch.is_empty() {
        return Ok(());
    }

    ledger.append(batch)?;
    batch.clear();
    Ok(())
}

fn log_outcome(records: &[RatingRecord]) {
    if records.is_empty() {
        info!("  No ratings found");
        return;
    }

    for record in records {
        let rating = record
            .rating
            .map(|r| format!("{r:.2}"))
            .unwrap_or_else(|| "invalid".to_string());
        info!("  {}: {} ({})", record.format, rating, record.confidence);
    }
    info!("  Date: {}", records[0].date);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Confidence, Storage};
    use crate::services::testing::{
        profiles, scraper, widget_page, MemoryStore, ScriptedRenderer, Step,
    };
    use std::sync::Arc;

    fn settings(interval: usize) -> IngestionSettings {
        IngestionSettings {
            politeness_delay: Duration::ZERO,
            checkpoint_interval: interval,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[tokio::test]
    async fn synthesizes_records_in_registry_order() {
        let store = Arc::new(MemoryStore::default());
        let profiles = profiles(3);
        let renderer = ScriptedRenderer::new(store.clone())
            .with(&profiles[0].profile_url, Step::Page(widget_page(Some("27.50"), Some("24.10"), Some("01/28/2026"))))
            .with(&profiles[1].profile_url, Step::NoContent)
            .with(&profiles[2].profile_url, Step::Page(widget_page(Some("31.2"), None, None)));
        let mut ledger = LedgerStore::load(store.clone()).unwrap();
        let mut ingestion = IngestionService::new(renderer, scraper(), settings(10));

        let summary = ingestion.run(&profiles, &mut ledger, today()).await.unwrap();

        assert_eq!(summary.profiles_scraped, 3);
        assert_eq!(summary.no_content, 1);
        assert_eq!(summary.doubles_added, 1);
        assert_eq!(summary.singles_added, 2);

        let records = store.load_ledger().unwrap().unwrap();
        let rows: Vec<_> = records
            .records()
            .iter()
            .map(|r| (r.name.as_str(), r.format, r.date))
            .collect();
        let jan_28 = NaiveDate::from_ymd_opt(2026, 1, 28).unwrap();
        assert_eq!(
            rows,
            vec![
                ("Player 1", Format::Doubles, jan_28),
                ("Player 1", Format::Singles, jan_28),
                ("Player 3", Format::Singles, today()),
            ]
        );
        assert_eq!(records.records()[0].confidence, Confidence::Unknown);
        assert_eq!(records.records()[1].confidence, Confidence::High);
    }

    #[tokio::test]
    async fn failures_do_not_stop_the_loop() {
        let store = Arc::new(MemoryStore::default());
        let profiles = profiles(3);
        let renderer = ScriptedRenderer::new(store.clone())
            .with(&profiles[0].profile_url, Step::Fail)
            .with(&profiles[1].profile_url, Step::NoContent)
            .with(&profiles[2].profile_url, Step::Page(widget_page(Some("30.0"), None, None)));
        let mut ledger = LedgerStore::load(store.clone()).unwrap();
        let mut ingestion = IngestionService::new(renderer, scraper(), settings(10));

        let summary = ingestion.run(&profiles, &mut ledger, today()).await.unwrap();

        assert_eq!(summary.failures, 1);
        assert_eq!(summary.no_content, 1);
        assert_eq!(summary.rows_added(), 1);
        assert_eq!(ledger.read_all().len(), 1);
    }

    #[tokio::test]
    async fn checkpoint_is_durable_before_the_eleventh_profile() {
        let store = Arc::new(MemoryStore::default());
        let profiles = profiles(12);
        let mut renderer = ScriptedRenderer::new(store.clone());
        for profile in &profiles[..10] {
            renderer = renderer.with(&profile.profile_url, Step::Page(widget_page(Some("25.0"), Some("26.0"), None)));
        }
        renderer = renderer.with(&profiles[10].profile_url, Step::Fail);
        let durable = renderer.durable_rows();
        let mut ledger = LedgerStore::load(store.clone()).unwrap();
        let mut ingestion = IngestionService::new(renderer, scraper(), settings(10));

        let summary = ingestion.run(&profiles, &mut ledger, today()).await.unwrap();

        let durable = durable.lock().unwrap();
        assert_eq!(durable[10], (profiles[10].profile_url.clone(), 20));
        assert_eq!(summary.checkpoints, 1);
        assert_eq!(summary.failures, 2);
    }

    #[tokio::test]
    async fn failed_checkpoint_keeps_the_batch_for_later() {
        let store = Arc::new(MemoryStore::default());
        let profiles = profiles(2);
        let renderer = ScriptedRenderer::new(store.clone())
            .with(&profiles[0].profile_url, Step::Page(widget_page(Some("25.0"), None, None)))
            .with(&profiles[1].profile_url, Step::Page(widget_page(Some("26.0"), None, None)));
        store.fail_next_writes(1);
        let mut ledger = LedgerStore::load(store.clone()).unwrap();
        let mut ingestion = IngestionService::new(renderer, scraper(), settings(1));

        let summary = ingestion.run(&profiles, &mut ledger, today()).await.unwrap();

        assert_eq!(summary.checkpoints, 1);
        assert_eq!(store.load_ledger().unwrap().unwrap().len(), 2);
    }
}
