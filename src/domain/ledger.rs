use super::RatingRecord;
use std::collections::BTreeSet;

/// A stored row that could not be read as a rating. It is written back
/// verbatim, just before the record at `position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldRow {
    pub position: usize,
    pub fields: Vec<String>,
}

/// Append-ordered history of every rating observed so far. Rows are never
/// deduplicated here; duplicates for the same key are expected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    records: Vec<RatingRecord>,
    held: Vec<HeldRow>,
}

impl Ledger {
    pub const COLUMNS: [&'static str; 6] = ["Name", "UAID", "Date", "Format", "Rating", "Confidence"];

    pub fn new(records: Vec<RatingRecord>) -> Self {
        Self {
            records,
            held: Vec::new(),
        }
    }

    /// `held` must be ordered by position.
    pub fn with_held(records: Vec<RatingRecord>, held: Vec<HeldRow>) -> Self {
        Self { records, held }
    }

    pub fn records(&self) -> &[RatingRecord] {
        &self.records
    }

    pub fn held(&self) -> &[HeldRow] {
        &self.held
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = RatingRecord>) {
        self.records.extend(records);
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.records.truncate(len);
        for row in &mut self.held {
            row.position = row.position.min(len);
        }
    }

    /// Drops the rows at the given positions and returns how many went.
    pub fn remove_rows(&mut self, rows: &BTreeSet<usize>) -> usize {
        let before = self.records.len();
        let mut index = 0;
        self.records.retain(|_| {
            let keep = !rows.contains(&index);
            index += 1;
            keep
        });
        for row in &mut self.held {
            row.position -= rows.range(..row.position).count();
        }
        before - self.records.len()
    }
}
