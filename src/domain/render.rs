use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLoad {
    /// Page source once the rating widget has rendered and settled.
    Rendered(String),
    /// The widget marker never showed up within the timeout.
    NoContent,
}

/// A browsing context that is reused for every profile in a run.
#[allow(async_fn_in_trait)]
pub trait PageRenderer {
    async fn load(&mut self, url: &str) -> Result<PageLoad>;
    async fn close(self) -> Result<()>;
}
