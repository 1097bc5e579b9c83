use async_trait::async_trait;
use chromiumoxide::{Browser as Chromium, BrowserConfig, Page};
use futures::StreamExt;
use scraper::{ElementRef, Html, Selector};
use std::path::PathBuf;
use tokio::task::JoinHandle;

use crate::browser::{Browser, Element, Locator};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Chrome/Chromium executable; detected automatically if `None`.
    pub executable: Option<PathBuf>,
    pub headless: bool,
}

/// A Chromium session driven over the DevTools protocol.
pub struct ChromeBrowser {
    browser: Chromium,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeBrowser {
    pub async fn launch(options: &LaunchOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &options.executable {
            builder = builder.chrome_executable(executable);
        }
        let config = builder.build().map_err(Error::Launch)?;

        let (browser, mut handler) = Chromium::launch(config).await?;
        // The handler must be polled for the session to make progress
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler error: {}", e);
                }
            }
        });
        let page = browser.new_page("about:blank").await?;
        tracing::info!("Browser session started");

        Ok(ChromeBrowser { browser, page, handler })
    }

    /// End the session. Must be called even if the run failed.
    pub async fn close(mut self) -> Result<()> {
        let closed = self.shut_down().await;
        release(&self.handler, closed)?;
        tracing::info!("Browser session closed");
        Ok(())
    }

    async fn shut_down(&mut self) -> Result<()> {
        self.browser.close().await?;
        self.browser.wait().await?;
        Ok(())
    }
}

#[async_trait]
impl Browser for ChromeBrowser {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| Error::Navigation(format!("{}: {}", url, e)))?;
        Ok(())
    }

    async fn find_all(&mut self, locator: &Locator) -> Result<Vec<Element>> {
        let content = self.page.content().await?;
        select_elements(&content, locator)
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.page
            .evaluate("window.scrollTo(0, document.body.scrollHeight);")
            .await?;
        Ok(())
    }

    async fn current_url(&mut self) -> Result<Option<String>> {
        Ok(self.page.url().await?)
    }

    async fn type_into(&mut self, selector: &str, text: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| Error::ElementNotFound(selector.to_string()))?;
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    async fn submit(&mut self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| Error::ElementNotFound(selector.to_string()))?;
        element.press_key("Enter").await?;
        Ok(())
    }
}

/// Stop the event handler whatever the outcome of closing the browser.
pub(crate) fn release(handler: &JoinHandle<()>, closed: Result<()>) -> Result<()> {
    handler.abort();
    closed
}

/// Match `locator` against a rendered page snapshot.
pub(crate) fn select_elements(content: &str, locator: &Locator) -> Result<Vec<Element>> {
    let container = parse_selector(locator.container)?;
    let text = locator.text.map(parse_selector).transpose()?;

    let doc = Html::parse_document(content);
    let elements = doc
        .select(&container)
        .map(|e| match &text {
            Some(selector) => Element {
                text: e.select(selector).next().map(element_text),
            },
            None => Element {
                text: Some(element_text(e)),
            },
        })
        .collect();
    Ok(elements)
}

fn element_text(e: ElementRef) -> String {
    e.text().collect::<String>().trim().to_string()
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| Error::InvalidSelector(format!("{}: {}", s, e)))
}
