mod browser;
mod scrapers;
mod storage;

pub use browser::webdriver::WebDriverSession;
pub use scrapers::{wtn_widget::WtnWidgetScraper, Selectors};
pub use storage::fs_store::FileSystemStore;
