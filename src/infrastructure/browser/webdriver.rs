use crate::config::TrackerConfig;
use crate::domain::{PageLoad, PageRenderer};
use crate::error::Result;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// One headless Chrome session driven over WebDriver, reused for every profile.
pub struct WebDriverSession {
    client: Client,
    marker_css: String,
    marker_timeout: Duration,
    settle_delay: Duration,
    blank_delay: Duration,
}

impl WebDriverSession {
    /// Starts the browser. Failing here ends the run.
    pub async fn open(webdriver_url: &str, config: &TrackerConfig) -> Result<Self> {
        let mut args = vec![
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            format!("--user-agent={}", config.user_agent),
        ];
        if config.headless {
            args.insert(0, "--headless".to_string());
        }

        let mut capabilities = serde_json::Map::new();
        capabilities.insert("browserName".to_string(), json!("chrome"));
        capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        info!("Connecting to WebDriver at {}", webdriver_url);
        let mut builder = ClientBuilder::native();
        builder.capabilities(capabilities);
        let client = builder.connect(webdriver_url).await?;

        Ok(Self {
            client,
            marker_css: config.widget.marker_css(),
            marker_timeout: config.marker_timeout(),
            settle_delay: config.settle_delay(),
            blank_delay: config.blank_delay(),
        })
    }
}

impl PageRenderer for WebDriverSession {
    async fn load(&mut self, url: &str) -> Result<PageLoad> {
        // Blank page first so nothing from the previous player lingers.
        self.client.goto("about:blank").await?;
        sleep(self.blank_delay).await;

        debug!("Loading {}", url);
        self.client.goto(url).await?;

        let marker = self
            .client
            .wait()
            .at_most(self.marker_timeout)
            .for_element(Locator::Css(&self.marker_css))
            .await;

        match marker {
            Ok(_) => {}
            Err(CmdError::WaitTimeout) => return Ok(PageLoad::NoContent),
            Err(e) => return Err(e.into()),
        }

        // The widget fills in its values asynchronously after the marker shows.
        sleep(self.settle_delay).await;

        Ok(PageLoad::Rendered(self.client.source().await?))
    }

    async fn close(self) -> Result<()> {
        self.client.close().await?;
        info!("Browser closed");
        Ok(())
    }
}
