use crate::domain::storage::Storage;
use crate::domain::{Ledger, RatingRecord};
use crate::error::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// In-memory ledger backed by durable storage. Every append rewrites the
/// whole table, so callers append at checkpoints rather than per record.
pub struct LedgerStore {
    store: Arc<dyn Storage>,
    ledger: Ledger,
}

impl LedgerStore {
    pub fn load(store: Arc<dyn Storage>) -> Result<Self> {
        let ledger = match store.load_ledger()? {
            Some(ledger) => {
                info!("Loaded existing ledger with {} records", ledger.len());
                if !ledger.held().is_empty() {
                    warn!("{} unreadable ledger rows will be written back unchanged", ledger.held().len());
                }
                ledger
            }
            None => {
                info!("No ledger yet, starting a new one");
                Ledger::default()
            }
        };

        Ok(Self { store, ledger })
    }

    /// Adds the records and persists the full table. On a failed write the
    /// in-memory ledger is rolled back so it never runs ahead of disk.
    pub fn append(&mut self, records: &[RatingRecord]) -> Result<()> {
        let before = self.ledger.len();
        self.ledger.extend(records.iter().cloned());

        if let Err(e) = self.store.save_ledger(&self.ledger) {
            self.ledger.truncate(before);
            return Err(e);
        }

        Ok(())
    }

    pub fn read_all(&self) -> &Ledger {
        &self.ledger
    }
}
