use crate::domain::{
    parse_date, parse_rating, Confidence, Format, HeldRow, Ledger, ProfileLink, RatingRecord,
    Storage,
};
use crate::error::{Result, WtnError};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const BOM: char = '\u{feff}';

/// One ledger line as it sits on disk. Everything is text so that coercion
/// happens in one place, on load.
#[derive(Debug, Serialize, Deserialize)]
struct LedgerRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "UAID")]
    uaid: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Format")]
    format: String,
    #[serde(rename = "Rating", default)]
    rating: String,
    #[serde(rename = "Confidence", default)]
    confidence: String,
}

impl LedgerRow {
    fn to_record(&self, line: usize) -> Result<RatingRecord> {
        let date = parse_date(&self.date).ok_or_else(|| {
            WtnError::Parse(format!("line {line}: invalid date '{}'", self.date))
        })?;
        let format = self
            .format
            .parse::<Format>()
            .map_err(|e| WtnError::Parse(format!("line {line}: {e}")))?;

        Ok(RatingRecord {
            name: self.name.clone(),
            uaid: self.uaid.clone(),
            date,
            format,
            rating: parse_rating(&self.rating),
            confidence: Confidence::from_label(Some(&self.confidence)),
        })
    }

    fn into_fields(self) -> Vec<String> {
        vec![self.name, self.uaid, self.date, self.format, self.rating, self.confidence]
    }
}

impl From<&HeldRow> for LedgerRow {
    fn from(row: &HeldRow) -> Self {
        let field = |i: usize| row.fields.get(i).cloned().unwrap_or_default();
        Self {
            name: field(0),
            uaid: field(1),
            date: field(2),
            format: field(3),
            rating: field(4),
            confidence: field(5),
        }
    }
}

impl From<&RatingRecord> for LedgerRow {
    fn from(record: &RatingRecord) -> Self {
        Self {
            name: record.name.clone(),
            uaid: record.uaid.clone(),
            date: record.date.format("%Y-%m-%d").to_string(),
            format: record.format.to_string(),
            rating: record.rating.map(|r| r.to_string()).unwrap_or_default(),
            confidence: record.confidence.to_string(),
        }
    }
}

/// CSV-backed store for the profile links table and the ratings ledger.
#[derive(Clone)]
pub struct FileSystemStore {
    profiles_path: PathBuf,
    ratings_path: PathBuf,
}

impl FileSystemStore {
    pub fn new(profiles_path: impl Into<PathBuf>, ratings_path: impl Into<PathBuf>) -> Self {
        Self {
            profiles_path: profiles_path.into(),
            ratings_path: ratings_path.into(),
        }
    }

    pub fn ratings_path(&self) -> &Path {
        &self.ratings_path
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    fn read_csv_file<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<Option<Vec<T>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let content = content.strip_prefix(BOM).unwrap_or(&content);

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let rows = reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;

        debug!("Read {} rows from {:?}", rows.len(), path);
        Ok(Some(rows))
    }

    /// Writes to a sibling temp file first and renames it into place, so the
    /// previous table survives a failed write. The temp file never outlives
    /// a failure.
    fn write_csv_file<T: Serialize>(&self, path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
        if let Some(dir) = path.parent() {
            self.ensure_dir(dir)?;
        }

        let file_name = path
            .file_name()
            .ok_or_else(|| WtnError::Other(format!("not a file path: {:?}", path)))?;
        let tmp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

        let written = write_rows(&tmp_path, header, rows)
            .and_then(|()| fs::rename(&tmp_path, path).map_err(WtnError::from));
        if let Err(e) = written {
            if tmp_path.exists() {
                if let Err(cleanup) = fs::remove_file(&tmp_path) {
                    warn!("Could not remove {:?}: {}", tmp_path, cleanup);
                }
            }
            return Err(e);
        }

        debug!("Wrote {} rows to {:?}", rows.len(), path);
        Ok(())
    }
}

fn write_rows<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
    let mut file = File::create(path)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut file);
        writer.write_record(header)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    file.sync_all()?;
    Ok(())
}

impl Storage for FileSystemStore {
    fn load_profiles(&self) -> Result<Vec<ProfileLink>> {
        self.read_csv_file(&self.profiles_path)?
            .ok_or_else(|| WtnError::MissingInput(self.profiles_path.clone()))
    }

    fn load_ledger(&self) -> Result<Option<Ledger>> {
        let Some(rows) = self.read_csv_file::<LedgerRow>(&self.ratings_path)? else {
            return Ok(None);
        };

        let mut records = Vec::with_capacity(rows.len());
        let mut held = Vec::new();
        for (i, row) in rows.into_iter().enumerate() {
            // Header is line 1.
            match row.to_record(i + 2) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Keeping unreadable ledger row as is: {}", e);
                    held.push(HeldRow {
                        position: records.len(),
                        fields: row.into_fields(),
                    });
                }
            }
        }

        Ok(Some(Ledger::with_held(records, held)))
    }

    fn save_ledger(&self, ledger: &Ledger) -> Result<()> {
        let mut held = ledger.held().iter().peekable();
        let mut rows = Vec::with_capacity(ledger.len() + ledger.held().len());
        for (index, record) in ledger.records().iter().enumerate() {
            while let Some(row) = held.next_if(|row| row.position <= index) {
                rows.push(LedgerRow::from(row));
            }
            rows.push(LedgerRow::from(record));
        }
        rows.extend(held.map(LedgerRow::from));

        self.write_csv_file(&self.ratings_path, &Ledger::COLUMNS, &rows)
    }
}
