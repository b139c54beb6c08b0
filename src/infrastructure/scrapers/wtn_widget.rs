use super::Selectors;
use crate::domain::{ExtractedSection, ProfileExtraction, SectionKind};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

static UPDATED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\bUpdated\b(.*)").unwrap());

/// Reads the WTN rating widget out of a rendered profile page.
pub struct WtnWidgetScraper {
    selectors: Selectors,
}

impl WtnWidgetScraper {
    pub fn new(selectors: Selectors) -> Self {
        Self { selectors }
    }

    pub fn extract(&self, html: &str) -> ProfileExtraction {
        let document = Html::parse_document(html);
        let mut extraction = ProfileExtraction::default();

        for (index, element) in document.select(&self.selectors.section).enumerate() {
            let section = self.extract_section(index, element);

            // Shared across a player's sections; the first one found sticks.
            if extraction.updated_date.is_none() {
                extraction.updated_date = section.updated_date_text.clone();
            }

            if section.kind == SectionKind::Unknown {
                debug!("Skipping unrecognised widget section {}", index);
                continue;
            }
            extraction.sections.push(section);
        }

        extraction
    }

    /// Each field is read on its own; a missing title only makes the
    /// section `Unknown`.
    fn extract_section(&self, index: usize, section: ElementRef<'_>) -> ExtractedSection {
        let kind = match first_text(section, &self.selectors.title) {
            Some(title) => SectionKind::classify(&title),
            None => {
                warn!("Widget section {} has no title", index);
                SectionKind::Unknown
            }
        };

        let confidence_text = first_text(section, &self.selectors.confidence)
            .and_then(|text| text.split_whitespace().next().map(str::to_string));

        let updated_date_text = section
            .select(&self.selectors.subtitle)
            .map(element_text)
            .find(|text| text.contains("Updated"))
            .and_then(|text| updated_date(&text));

        ExtractedSection {
            kind,
            rating_text: first_text(section, &self.selectors.value),
            confidence_text,
            updated_date_text,
        }
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed text of the first match, or `None` when missing or blank.
fn first_text(section: ElementRef<'_>, selector: &Selector) -> Option<String> {
    section
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn updated_date(subtitle: &str) -> Option<String> {
    UPDATED
        .captures(subtitle)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|date| !date.is_empty())
}
