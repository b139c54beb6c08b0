use crate::domain::{Format, Ledger, ProfileLink, RatingRecord};
use chrono::NaiveDate;
use clap::ValueEnum;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatFilter {
    Singles,
    Doubles,
    Both,
}

impl FormatFilter {
    fn matches(&self, format: Format) -> bool {
        match self {
            FormatFilter::Singles => format == Format::Singles,
            FormatFilter::Doubles => format == Format::Doubles,
            FormatFilter::Both => true,
        }
    }
}

/// Leaderboard ordering. A lower WTN is the stronger player, so both
/// directions are useful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RankOrder {
    Highest,
    Lowest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<'a> {
    pub date: Option<NaiveDate>,
    pub records: Vec<&'a RatingRecord>,
    pub players: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileOverview<'a> {
    pub profile: &'a ProfileLink,
    pub singles: Option<&'a RatingRecord>,
    pub doubles: Option<&'a RatingRecord>,
}

/// Read-only views over the ledger. "Current" always means the latest date
/// per player and format, never the latest appended row.
pub struct ReportService<'a> {
    ledger: &'a Ledger,
}

impl<'a> ReportService<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Current record per (Name, Format), sorted by name then format. When a
    /// player has several rows on the latest date, the last appended wins.
    pub fn current_ratings(&self, filter: FormatFilter) -> Vec<&'a RatingRecord> {
        let mut current: HashMap<(&str, Format), &'a RatingRecord> = HashMap::new();

        for record in self.ledger.records().iter().filter(|r| filter.matches(r.format)) {
            current
                .entry((record.name.as_str(), record.format))
                .and_modify(|existing| {
                    if record.date >= existing.date {
                        *existing = record;
                    }
                })
                .or_insert(record);
        }

        let mut current: Vec<_> = current.into_values().collect();
        current.sort_by(|a, b| a.name.cmp(&b.name).then(a.format.cmp(&b.format)));
        current
    }

    pub fn player_history(&self, name: &str, filter: FormatFilter) -> Vec<&'a RatingRecord> {
        let mut history: Vec<_> = self
            .ledger
            .records()
            .iter()
            .filter(|r| r.name == name && filter.matches(r.format))
            .collect();
        history.sort_by_key(|r| (r.format, r.date));
        history
    }

    /// Every record on the most recent date present in the filtered ledger.
    pub fn latest_snapshot(&self, filter: FormatFilter) -> Snapshot<'a> {
        let filtered = self.ledger.records().iter().filter(|r| filter.matches(r.format));
        let date = filtered.clone().map(|r| r.date).max();

        let records: Vec<&RatingRecord> = filtered.filter(|r| Some(r.date) == date).collect();
        let ratings: Vec<f64> = records.iter().filter_map(|r| r.rating).collect();
        let players = records.iter().map(|r| r.name.as_str()).collect::<HashSet<_>>().len();

        let mean = (!ratings.is_empty()).then(|| ratings.iter().sum::<f64>() / ratings.len() as f64);
        let min = ratings.iter().copied().reduce(f64::min);
        let max = ratings.iter().copied().reduce(f64::max);

        Snapshot {
            date,
            records,
            players,
            mean,
            min,
            max,
        }
    }

    pub fn leaderboard(&self, filter: FormatFilter, order: RankOrder, limit: usize) -> Vec<&'a RatingRecord> {
        let mut rated: Vec<_> = self
            .latest_snapshot(filter)
            .records
            .into_iter()
            .filter(|r| r.rating.is_some())
            .collect();

        rated.sort_by(|a, b| {
            let ordering = a.rating.partial_cmp(&b.rating).unwrap_or(Ordering::Equal);
            match order {
                RankOrder::Highest => ordering.reverse(),
                RankOrder::Lowest => ordering,
            }
        });
        rated.truncate(limit);
        rated
    }

    /// Each profile with its current ratings, joined on (Name, UAID).
    /// Profiles with no ratings yet are still listed.
    pub fn profile_overview(&self, profiles: &'a [ProfileLink]) -> Vec<ProfileOverview<'a>> {
        let current = self.current_ratings(FormatFilter::Both);
        let find = |profile: &ProfileLink, format: Format| {
            current
                .iter()
                .copied()
                .find(|r| r.name == profile.name && r.uaid == profile.uaid && r.format == format)
        };

        profiles
            .iter()
            .map(|profile| ProfileOverview {
                profile,
                singles: find(profile, Format::Singles),
                doubles: find(profile, Format::Doubles),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Confidence;

    fn row(name: &str, date: (i32, u32, u32), format: Format, rating: Option<f64>) -> RatingRecord {
        RatingRecord {
            name: name.to_string(),
            uaid: format!("uaid-{name}"),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            format,
            rating,
            confidence: Confidence::Unknown,
        }
    }

    #[test]
    fn current_rating_follows_date_not_insertion_order() {
        let ledger = Ledger::new(vec![
            row("Ada", (2026, 2, 1), Format::Singles, Some(26.0)),
            row("Ada", (2026, 1, 1), Format::Singles, Some(29.0)),
        ]);

        let current = ReportService::new(&ledger).current_ratings(FormatFilter::Singles);

        assert_eq!(current.len(), 1);
        assert_eq!(current[0].rating, Some(26.0));
    }

    #[test]
    fn current_ratings_are_per_format() {
        let ledger = Ledger::new(vec![
            row("Ada", (2026, 1, 1), Format::Singles, Some(29.0)),
            row("Ada", (2026, 1, 8), Format::Doubles, Some(22.0)),
            row("Ada", (2026, 1, 8), Format::Doubles, Some(21.5)),
        ]);

        let current = ReportService::new(&ledger).current_ratings(FormatFilter::Both);

        assert_eq!(current.len(), 2);
        assert_eq!(current[0].format, Format::Singles);
        assert_eq!(current[1].rating, Some(21.5));
    }

    #[test]
    fn snapshot_of_empty_ledger() {
        let ledger = Ledger::default();
        let snapshot = ReportService::new(&ledger).latest_snapshot(FormatFilter::Both);

        assert_eq!(snapshot.date, None);
        assert!(snapshot.records.is_empty());
        assert_eq!(snapshot.players, 0);
        assert_eq!(snapshot.mean, None);
    }

    #[test]
    fn snapshot_statistics_skip_missing_ratings() {
        let ledger = Ledger::new(vec![
            row("Ada", (2026, 1, 1), Format::Singles, Some(40.0)),
            row("Ada", (2026, 2, 1), Format::Singles, Some(20.0)),
            row("Grace", (2026, 2, 1), Format::Singles, Some(30.0)),
            row("Alan", (2026, 2, 1), Format::Singles, None),
        ]);

        let snapshot = ReportService::new(&ledger).latest_snapshot(FormatFilter::Singles);

        assert_eq!(snapshot.records.len(), 3);
        assert_eq!(snapshot.players, 3);
        assert_eq!(snapshot.mean, Some(25.0));
        assert_eq!(snapshot.min, Some(20.0));
        assert_eq!(snapshot.max, Some(30.0));
    }

    #[test]
    fn leaderboard_in_both_orders() {
        let ledger = Ledger::new(vec![
            row("Ada", (2026, 2, 1), Format::Singles, Some(20.0)),
            row("Grace", (2026, 2, 1), Format::Singles, Some(30.0)),
            row("Alan", (2026, 2, 1), Format::Singles, Some(25.0)),
            row("Edsger", (2026, 2, 1), Format::Singles, None),
        ]);
        let report = ReportService::new(&ledger);

        let highest: Vec<_> = report
            .leaderboard(FormatFilter::Both, RankOrder::Highest, 2)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        let lowest: Vec<_> = report
            .leaderboard(FormatFilter::Both, RankOrder::Lowest, 10)
            .iter()
            .map(|r| r.name.as_str())
            .collect();

        assert_eq!(highest, ["Grace", "Alan"]);
        assert_eq!(lowest, ["Ada", "Alan", "Grace"]);
    }

    #[test]
    fn overview_lists_unrated_profiles() {
        let ledger = Ledger::new(vec![row("Ada", (2026, 2, 1), Format::Doubles, Some(22.0))]);
        let profiles = vec![
            ProfileLink::new("Ada", "uaid-Ada", "https://example.test/ada"),
            ProfileLink::new("Grace", "uaid-Grace", "https://example.test/grace"),
        ];

        let overview = ReportService::new(&ledger).profile_overview(&profiles);

        assert_eq!(overview.len(), 2);
        assert_eq!(overview[0].doubles.and_then(|r| r.rating), Some(22.0));
        assert!(overview[0].singles.is_none());
        assert!(overview[1].doubles.is_none());
    }
}
