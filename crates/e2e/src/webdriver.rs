//! WebDriver binding for the browser capability traits

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;
use tracing::{debug, info};

use crate::browser::{Element, Key, Locator, Session, WaitCondition};
use crate::config::{BrowserKind, SuiteConfig};
use crate::error::{E2eError, E2eResult};

/// A live WebDriver session
pub struct WebDriverSession {
    driver: WebDriver,
    poll_interval: Duration,
}

impl WebDriverSession {
    /// Open a new browser session against `server_url`
    pub async fn connect(server_url: &str, config: &SuiteConfig) -> E2eResult<Self> {
        info!(
            "Opening {} session via {} (headless: {})",
            config.browser.as_str(),
            server_url,
            config.headless
        );

        let driver = match config.browser {
            BrowserKind::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                if config.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(server_url, caps).await?
            }
            BrowserKind::Firefox => {
                let mut caps = DesiredCapabilities::firefox();
                if config.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(server_url, caps).await?
            }
        };

        driver
            .set_window_rect(0, 0, config.window_width, config.window_height)
            .await?;

        Ok(Self {
            driver,
            poll_interval: config.poll_interval(),
        })
    }

    fn by(locator: &Locator) -> By {
        match locator {
            Locator::Name(v) => By::Name(v.as_str()),
            Locator::XPath(v) => By::XPath(v.as_str()),
            Locator::Css(v) => By::Css(v.as_str()),
            Locator::ClassName(v) => By::ClassName(v.as_str()),
        }
    }
}

#[async_trait]
impl Session for WebDriverSession {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!("Navigating to {}", url);
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn title(&self) -> E2eResult<String> {
        Ok(self.driver.title().await?)
    }

    async fn wait_for(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> E2eResult<Box<dyn Element>> {
        debug!("Waiting up to {:?} for {} to be {}", timeout, locator, condition.as_str());

        let query = self
            .driver
            .query(Self::by(locator))
            .wait(timeout, self.poll_interval);
        let query = match condition {
            WaitCondition::Present => query,
            WaitCondition::Visible => query.and_displayed(),
            WaitCondition::Clickable => query.and_clickable(),
        };

        match query.first().await {
            Ok(element) => Ok(Box::new(WebDriverElement { element })),
            Err(WebDriverError::NoSuchElement(..)) => Err(E2eError::Timeout {
                what: format!("{} to be {}", locator, condition.as_str()),
                seconds: timeout.as_secs(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_screenshot(&self, path: &Path) -> E2eResult<()> {
        self.driver.screenshot(path).await?;
        Ok(())
    }

    async fn quit(&self) -> E2eResult<()> {
        info!("Quitting browser session");
        self.driver.clone().quit().await?;
        Ok(())
    }
}

struct WebDriverElement {
    element: WebElement,
}

#[async_trait]
impl Element for WebDriverElement {
    async fn text(&self) -> E2eResult<String> {
        Ok(self.element.text().await?)
    }

    async fn value(&self) -> E2eResult<Option<String>> {
        Ok(self.element.value().await?)
    }

    async fn clear(&self) -> E2eResult<()> {
        self.element.clear().await?;
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> E2eResult<()> {
        self.element.send_keys(text).await?;
        Ok(())
    }

    async fn press(&self, key: Key) -> E2eResult<()> {
        let key = match key {
            Key::ArrowDown => thirtyfour::Key::Down,
            Key::Enter => thirtyfour::Key::Enter,
        };
        self.element.send_keys(key).await?;
        Ok(())
    }

    async fn click(&self) -> E2eResult<()> {
        self.element.click().await?;
        Ok(())
    }

    async fn is_selected(&self) -> E2eResult<bool> {
        Ok(self.element.is_selected().await?)
    }

    async fn find(&self, locator: &Locator) -> E2eResult<Box<dyn Element>> {
        let element = self.element.find(WebDriverSession::by(locator)).await?;
        Ok(Box::new(WebDriverElement { element }))
    }
}
