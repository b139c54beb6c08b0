use crate::domain::storage::Storage;
use crate::domain::{Ledger, RatingRecord};
use crate::error::Result;
use chrono::NaiveDate;
use clap::ValueEnum;
use std::collections::{BTreeSet, HashMap};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum KeyColumn {
    Name,
    Uaid,
    Date,
    Format,
}

impl KeyColumn {
    fn value(&self, record: &RatingRecord) -> String {
        match self {
            KeyColumn::Name => record.name.clone(),
            KeyColumn::Uaid => record.uaid.clone(),
            KeyColumn::Date => record.date.to_string(),
            KeyColumn::Format => record.format.to_string(),
        }
    }
}

/// Describes the rows a faulty run wrote: every row on `bad_date` rated
/// exactly `bad_value`. Rows sharing `key` are treated as the same observation.
#[derive(Debug, Clone)]
pub struct CorrectionRule {
    pub bad_date: NaiveDate,
    pub bad_value: f64,
    pub key: Vec<KeyColumn>,
}

impl CorrectionRule {
    pub fn new(bad_date: NaiveDate, bad_value: f64) -> Self {
        Self {
            bad_date,
            bad_value,
            key: vec![KeyColumn::Name, KeyColumn::Date, KeyColumn::Format],
        }
    }

    pub fn with_key(mut self, key: Vec<KeyColumn>) -> Self {
        if !key.is_empty() {
            self.key = key;
        }
        self
    }

    fn is_sentinel(&self, record: &RatingRecord) -> bool {
        record.date == self.bad_date && record.has_rating(self.bad_value)
    }

    fn key_of(&self, record: &RatingRecord) -> Vec<String> {
        self.key.iter().map(|column| column.value(record)).collect()
    }
}

impl Default for CorrectionRule {
    fn default() -> Self {
        let bad_date = NaiveDate::from_ymd_opt(2026, 1, 28).expect("valid calendar date");
        Self::new(bad_date, 34.21)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectionReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub removed: usize,
    pub retained_lone: usize,
}

pub struct CorrectionService {
    rule: CorrectionRule,
}

impl CorrectionService {
    pub fn new(rule: CorrectionRule) -> Self {
        Self { rule }
    }

    /// Row positions to delete: sentinel rows whose key also has a row with a
    /// real, different rating. Also returns how many sentinel rows stay.
    pub fn plan(&self, ledger: &Ledger) -> (BTreeSet<usize>, usize) {
        let records = ledger.records();

        let mut groups: HashMap<Vec<String>, Vec<usize>> = HashMap::new();
        for (index, record) in records.iter().enumerate() {
            groups.entry(self.rule.key_of(record)).or_default().push(index);
        }

        let mut removals = BTreeSet::new();
        let mut retained = 0;

        for (index, record) in records.iter().enumerate() {
            if !self.rule.is_sentinel(record) {
                continue;
            }

            let group = &groups[&self.rule.key_of(record)];
            let alternative = group
                .iter()
                .map(|&i| &records[i])
                .find(|other| other.rating.is_some() && !other.has_rating(self.rule.bad_value));

            match alternative {
                Some(other) if group.len() > 1 => {
                    info!(
                        "Removing duplicate {} for {} (has correct value: {})",
                        self.rule.bad_value,
                        record.name,
                        other.rating.map_or_else(String::new, |r| r.to_string())
                    );
                    removals.insert(index);
                }
                _ => {
                    info!("Keeping {} for {} (no duplicate found)", self.rule.bad_value, record.name);
                    retained += 1;
                }
            }
        }

        (removals, retained)
    }

    pub fn correct(&self, ledger: &mut Ledger) -> CorrectionReport {
        let rows_before = ledger.len();
        let (removals, retained_lone) = self.plan(ledger);
        let removed = ledger.remove_rows(&removals);

        CorrectionReport {
            rows_before,
            rows_after: ledger.len(),
            removed,
            retained_lone,
        }
    }

    /// Reads the stored ledger, removes fixable sentinel rows and writes it
    /// back. Nothing is written when there is nothing to remove.
    pub fn apply(&self, store: &dyn Storage) -> Result<CorrectionReport> {
        let mut ledger = store.load_ledger()?.unwrap_or_default();
        info!("Total rows before cleaning: {}", ledger.len());

        let report = self.correct(&mut ledger);
        if report.removed > 0 {
            store.save_ledger(&ledger)?;
        }

        info!("Total rows removed: {}", report.removed);
        info!("Total rows after cleaning: {}", report.rows_after);
        Ok(report)
    }
}
