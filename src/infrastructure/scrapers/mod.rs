use crate::config::WidgetClasses;
use crate::error::{Result, WtnError};
use scraper::Selector;

pub(crate) mod wtn_widget;

pub struct Selectors {
    pub section: Selector,
    pub title: Selector,
    pub value: Selector,
    pub confidence: Selector,
    pub subtitle: Selector,
}

impl Selectors {
    pub fn new(classes: &WidgetClasses) -> Result<Self> {
        Ok(Self {
            section: class_selector(&classes.section)?,
            title: class_selector(&classes.title)?,
            value: class_selector(&classes.value)?,
            confidence: class_selector(&classes.confidence)?,
            subtitle: class_selector(&classes.subtitle)?,
        })
    }
}

fn class_selector(class: &str) -> Result<Selector> {
    Selector::parse(&format!(".{}", class.trim()))
        .map_err(|e| WtnError::Selector(format!("{class}: {e}")))
}
