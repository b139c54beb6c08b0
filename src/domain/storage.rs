use super::{Ledger, ProfileLink};
use crate::error::Result;

pub trait Storage: Send + Sync {
    fn load_profiles(&self) -> Result<Vec<ProfileLink>>;
    /// `None` when no ledger has been written yet.
    fn load_ledger(&self) -> Result<Option<Ledger>>;
    /// Rewrites the whole ledger.
    fn save_ledger(&self, ledger: &Ledger) -> Result<()>;
}

pub struct StorageKeys;

impl StorageKeys {
    pub const PROFILES_FILE: &'static str = "wtn_profile_links.csv";
    pub const RATINGS_FILE: &'static str = "wtn_ratings.csv";
}
