use crate::config::WidgetClasses;
use crate::domain::{Ledger, PageLoad, PageRenderer, ProfileLink, Storage};
use crate::error::{Result, WtnError};
use crate::infrastructure::{Selectors, WtnWidgetScraper};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MemoryStore {
    ledger: Mutex<Option<Ledger>>,
    failing_writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: Mutex::new(Some(ledger)),
            ..Default::default()
        }
    }

    pub fn fail_next_writes(&self, count: usize) {
        *self.failing_writes.lock().unwrap() = count;
    }

    fn durable_len(&self) -> usize {
        self.ledger.lock().unwrap().as_ref().map_or(0, Ledger::len)
    }
}

impl Storage for MemoryStore {
    fn load_profiles(&self) -> Result<Vec<ProfileLink>> {
        Ok(profiles(3))
    }

    fn load_ledger(&self) -> Result<Option<Ledger>> {
        Ok(self.ledger.lock().unwrap().clone())
    }

    fn save_ledger(&self, ledger: &Ledger) -> Result<()> {
        let mut failing = self.failing_writes.lock().unwrap();
        if *failing > 0 {
            *failing -= 1;
            return Err(WtnError::Other("simulated write failure".to_string()));
        }
        *self.ledger.lock().unwrap() = Some(ledger.clone());
        Ok(())
    }
}

pub enum Step {
    Page(String),
    NoContent,
    Fail,
}

/// Serves canned pages by URL and notes how many ledger rows were durable
/// at the moment each URL was requested.
pub struct ScriptedRenderer {
    steps: HashMap<String, Step>,
    store: Arc<MemoryStore>,
    durable_rows: Arc<Mutex<Vec<(String, usize)>>>,
}

impl ScriptedRenderer {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            steps: HashMap::new(),
            store,
            durable_rows: Arc::default(),
        }
    }

    pub fn with(mut self, url: &str, step: Step) -> Self {
        self.steps.insert(url.to_string(), step);
        self
    }

    pub fn durable_rows(&self) -> Arc<Mutex<Vec<(String, usize)>>> {
        self.durable_rows.clone()
    }
}

impl PageRenderer for ScriptedRenderer {
    async fn load(&mut self, url: &str) -> Result<PageLoad> {
        self.durable_rows
            .lock()
            .unwrap()
            .push((url.to_string(), self.store.durable_len()));

        match self.steps.get(url) {
            Some(Step::Page(html)) => Ok(PageLoad::Rendered(html.clone())),
            Some(Step::NoContent) => Ok(PageLoad::NoContent),
            Some(Step::Fail) | None => Err(WtnError::Other(format!("navigation to {url} failed"))),
        }
    }

    async fn close(self) -> Result<()> {
        Ok(())
    }
}

pub fn profiles(count: usize) -> Vec<ProfileLink> {
    (1..=count)
        .map(|i| {
            ProfileLink::new(
                format!("Player {i}"),
                format!("20100{i:05}"),
                format!("https://example.test/players/{i}"),
            )
        })
        .collect()
}

pub fn scraper() -> WtnWidgetScraper {
    WtnWidgetScraper::new(Selectors::new(&WidgetClasses::default()).unwrap())
}

/// A profile page with the singles section (High confidence) and/or the
/// doubles section (no confidence label).
pub fn widget_page(singles: Option<&str>, doubles: Option<&str>, updated: Option<&str>) -> String {
    let subtitle = updated
        .map(|date| format!(r#"<div class="v-form-wtn-widget__section-subtitle">Updated {date}</div>"#))
        .unwrap_or_default();
    let mut sections = String::new();
    if let Some(rating) = doubles {
        sections.push_str(&format!(
            r#"<div class="v-form-wtn-widget__section">
                 <div class="v-form-wtn-widget__section-title">WTN DOUBLES</div>
                 <div class="v-form-wtn-widget__section-value">{rating}</div>
                 {subtitle}
               </div>"#
        ));
    }
    if let Some(rating) = singles {
        sections.push_str(&format!(
            r#"<div class="v-form-wtn-widget__section">
                 <div class="v-form-wtn-widget__section-title">WTN SINGLES</div>
                 <div class="v-form-wtn-widget__section-value">{rating}</div>
                 <div class="v-form-wtn-widget__section-confidence">High Confidence</div>
                 {subtitle}
               </div>"#
        ));
    }
    format!("<html><body>{sections}</body></html>")
}
