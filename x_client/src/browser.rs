use async_trait::async_trait;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::error::{Error, Result};

/// Where to find elements on a page: every match of `container`, with the text
/// of its first `text` descendant (or its own text if `text` is `None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locator {
    pub container: &'static str,
    pub text: Option<&'static str>,
}

impl Locator {
    pub const fn new(container: &'static str) -> Self {
        Locator { container, text: None }
    }

    pub const fn nested(container: &'static str, text: &'static str) -> Self {
        Locator {
            container,
            text: Some(text),
        }
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.text {
            Some(text) => write!(f, "{} {}", self.container, text),
            None => write!(f, "{}", self.container),
        }
    }
}

/// Snapshot of a rendered element. `text` is `None` when the element has no
/// matching text descendant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub text: Option<String>,
}

impl Element {
    pub fn new(text: impl Into<String>) -> Self {
        Element { text: Some(text.into()) }
    }

    pub fn empty() -> Self {
        Element { text: None }
    }
}

/// The capabilities of an automated browser session the scrapers rely on.
#[async_trait]
pub trait Browser: Send {
    async fn navigate(&mut self, url: &str) -> Result<()>;

    async fn find_all(&mut self, locator: &Locator) -> Result<Vec<Element>>;

    async fn scroll_to_bottom(&mut self) -> Result<()>;

    async fn current_url(&mut self) -> Result<Option<String>>;

    /// Focus the first element matching `selector` and type `text` into it.
    async fn type_into(&mut self, selector: &str, text: &str) -> Result<()>;

    /// Press Enter in the first element matching `selector`.
    async fn submit(&mut self, selector: &str) -> Result<()>;

    /// Poll until at least one element matches `locator`.
    async fn wait_until_present(&mut self, locator: &Locator, timeout: Duration, poll_interval: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.find_all(locator).await?.is_empty() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Error::Timeout(locator.to_string()));
            }
            sleep(poll_interval).await;
        }
    }
}
