mod ledger;
mod profile;
mod rating;
pub mod render;
mod section;
pub(crate) mod storage;

pub use ledger::{HeldRow, Ledger};
pub use profile::ProfileLink;
pub use rating::{parse_date, parse_rating, Confidence, Format, RatingRecord, RecordBuilder};
pub use render::{PageLoad, PageRenderer};
pub use section::{ExtractedSection, ProfileExtraction, SectionKind};
pub use storage::{Storage, StorageKeys};
