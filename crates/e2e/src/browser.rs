//! Browser capability traits
//!
//! Page objects talk to the browser only through [`Session`] and
//! [`Element`]. The production binding lives in [`crate::webdriver`]; tests
//! provide a scripted in-memory implementation.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::E2eResult;

/// How to find an element on the page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Name(String),
    XPath(String),
    Css(String),
    ClassName(String),
}

impl Locator {
    pub fn name(value: impl Into<String>) -> Self {
        Locator::Name(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Locator::XPath(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Locator::Css(value.into())
    }

    pub fn class_name(value: impl Into<String>) -> Self {
        Locator::ClassName(value.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Name(v) => write!(f, "name={}", v),
            Locator::XPath(v) => write!(f, "xpath={}", v),
            Locator::Css(v) => write!(f, "css={}", v),
            Locator::ClassName(v) => write!(f, "class={}", v),
        }
    }
}

/// Condition a bounded wait polls for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    /// Attached to the DOM
    Present,
    Visible,
    /// Displayed and enabled
    Clickable,
}

impl WaitCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitCondition::Present => "present",
            WaitCondition::Visible => "visible",
            WaitCondition::Clickable => "clickable",
        }
    }
}

/// Special keys sent to custom widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    Enter,
}

/// A located element
#[async_trait]
pub trait Element: Send + Sync {
    /// Visible text
    async fn text(&self) -> E2eResult<String>;

    /// Current `value` property of an input
    async fn value(&self) -> E2eResult<Option<String>>;

    async fn clear(&self) -> E2eResult<()>;

    async fn send_keys(&self, text: &str) -> E2eResult<()>;

    async fn press(&self, key: Key) -> E2eResult<()>;

    async fn click(&self) -> E2eResult<()>;

    async fn is_selected(&self) -> E2eResult<bool>;

    /// Immediate child lookup, no waiting
    async fn find(&self, locator: &Locator) -> E2eResult<Box<dyn Element>>;

    /// Clear the field, then type `text`
    async fn write_text(&self, text: &str) -> E2eResult<()> {
        self.clear().await?;
        self.send_keys(text).await
    }
}

/// One browser session, owned by a single scenario
#[async_trait]
pub trait Session: Send + Sync {
    async fn goto(&self, url: &str) -> E2eResult<()>;

    async fn title(&self) -> E2eResult<String>;

    /// Poll until `locator` satisfies `condition` or `timeout` expires.
    ///
    /// Expiry is reported as [`crate::E2eError::Timeout`].
    async fn wait_for(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> E2eResult<Box<dyn Element>>;

    async fn save_screenshot(&self, path: &Path) -> E2eResult<()>;

    /// End the session. Further calls fail.
    async fn quit(&self) -> E2eResult<()>;
}
