use super::{ExtractedSection, ProfileExtraction, ProfileLink, SectionKind};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    Singles,
    Doubles,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Singles => "Singles",
            Format::Doubles => "Doubles",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "singles" => Ok(Format::Singles),
            "doubles" => Ok(Format::Doubles),
            other => Err(format!("unknown format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Confidence {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Confidence {
    /// Maps a scraped label such as "High" or "high" to a tier. Anything
    /// unrecognised, including an absent label, is `Unknown`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_lowercase()).as_deref() {
            Some("high") => Confidence::High,
            Some("medium") => Confidence::Medium,
            Some("low") => Confidence::Low,
            _ => Confidence::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
            Confidence::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatingRecord {
    pub name: String,
    pub uaid: String,
    pub date: NaiveDate,
    pub format: Format,
    pub rating: Option<f64>,
    pub confidence: Confidence,
}

impl RatingRecord {
    pub fn has_rating(&self, value: f64) -> bool {
        self.rating.is_some_and(|r| (r - value).abs() < 1e-9)
    }
}

/// Parses a rating as shown on the page. Invalid or non-finite text is absent,
/// never an error.
pub fn parse_rating(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%b %d, %Y", "%B %d, %Y"];

/// Accepts ISO dates, the `MM/DD/YYYY` form used by the widget and the
/// spelled-out month forms found in older ledgers.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Turns one page's extraction into ledger rows for a profile, filling in
/// defaults that the extractor deliberately leaves open.
pub struct RecordBuilder {
    today: NaiveDate,
}

impl RecordBuilder {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// The date every record from this page is filed under.
    pub fn resolve_date(&self, extraction: &ProfileExtraction) -> NaiveDate {
        extraction
            .updated_date
            .as_deref()
            .and_then(parse_date)
            .unwrap_or(self.today)
    }

    pub fn build(&self, profile: &ProfileLink, extraction: &ProfileExtraction) -> Vec<RatingRecord> {
        let date = self.resolve_date(extraction);

        [(SectionKind::Doubles, Format::Doubles), (SectionKind::Singles, Format::Singles)]
            .into_iter()
            .filter_map(|(kind, format)| {
                let section = extraction.section(kind)?;
                self.record_for(profile, section, format, date)
            })
            .collect()
    }

    fn record_for(
        &self,
        profile: &ProfileLink,
        section: &ExtractedSection,
        format: Format,
        date: NaiveDate,
    ) -> Option<RatingRecord> {
        let rating_text = section.rating_text.as_deref().filter(|t| !t.trim().is_empty())?;

        Some(RatingRecord {
            name: profile.name.clone(),
            uaid: profile.uaid.clone(),
            date,
            format,
            rating: parse_rating(rating_text),
            confidence: Confidence::from_label(section.confidence_text.as_deref()),
        })
    }
}
