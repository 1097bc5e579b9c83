use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;
use tokio_retry::strategy::FixedInterval;
use url::Url;

use copycat_util::{is_account_handle, is_reply_text, ACCOUNT_MARKER, DEFAULT_MIN_REPLY_LENGTH};

use crate::browser::{Browser, Element, Locator};
use crate::consts::*;
use crate::error::Result;
use crate::selectors;

#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Pause after each scroll and form submission to let the page render.
    pub settle_delay: Duration,
    /// How long to wait for the first element of a page to appear.
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
    /// Extra attempts per target after a retryable failure.
    pub retries: usize,
    pub retry_delay: Duration,
    pub min_reply_length: usize,
    pub search_language: String,
    /// Where each finished scrape is dumped as JSON, `CLIENT_LOG_DIR` by default.
    pub dump_dir: Option<PathBuf>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        ScrapeOptions {
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            wait_timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            retries: 0,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            min_reply_length: DEFAULT_MIN_REPLY_LENGTH,
            search_language: DEFAULT_SEARCH_LANGUAGE.to_string(),
            dump_dir: std::env::var_os("CLIENT_LOG_DIR").map(PathBuf::from),
        }
    }
}

impl ScrapeOptions {
    /// Default options with every delay and timeout set to zero and no dump.
    pub fn immediate() -> Self {
        ScrapeOptions {
            settle_delay: Duration::ZERO,
            wait_timeout: Duration::ZERO,
            poll_interval: Duration::ZERO,
            retry_delay: Duration::ZERO,
            dump_dir: None,
            ..Default::default()
        }
    }
}

/// What a scrolling page is harvested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Harvest {
    Replies,
    Followers,
}

impl Harvest {
    fn locator(self) -> &'static Locator {
        match self {
            Harvest::Replies => &selectors::search::REPLY,
            Harvest::Followers => &selectors::followers::HANDLE,
        }
    }

    fn keeps(self, text: &str, options: &ScrapeOptions) -> bool {
        match self {
            Harvest::Replies => is_reply_text(text, options.min_reply_length),
            Harvest::Followers => is_account_handle(text),
        }
    }
}

impl Display for Harvest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Harvest::Replies => write!(f, "replies"),
            Harvest::Followers => write!(f, "followers"),
        }
    }
}

/// Scrape the replies authored by `username` from the search view.
pub async fn scrape_replies<B>(browser: &mut B, username: &str, options: &ScrapeOptions) -> Result<Vec<String>>
where
    B: Browser + ?Sized,
{
    let url = search_url(username, &options.search_language)?;
    scrape_with_retry(browser, &url, username, Harvest::Replies, options).await
}

/// Scrape the handles listed on the followers page of `profile_url`.
pub async fn scrape_followers<B>(browser: &mut B, profile_url: &str, options: &ScrapeOptions) -> Result<Vec<String>>
where
    B: Browser + ?Sized,
{
    let url = followers_url(profile_url)?;
    let target = profile_url.trim_end_matches('/').rsplit('/').next().unwrap_or(profile_url);
    scrape_with_retry(browser, &url, target, Harvest::Followers, options).await
}

// `RetryIf::spawn` needs a closure returning an owned future, which cannot
// hold the `&mut B` borrow across attempts.
async fn scrape_with_retry<B>(
    browser: &mut B,
    url: &Url,
    target: &str,
    harvest: Harvest,
    options: &ScrapeOptions,
) -> Result<Vec<String>>
where
    B: Browser + ?Sized,
{
    let mut delays = FixedInterval::new(options.retry_delay).take(options.retries);
    loop {
        match scrape_until_idle(browser, url, target, harvest, options).await {
            Err(e) if e.retryable() => match delays.next() {
                Some(delay) => {
                    tracing::warn!("Scraping {} from {} failed, retrying: {}", harvest, url, e);
                    sleep(delay).await;
                }
                None => return Err(e),
            },
            result => return result,
        }
    }
}

/// Collect matching texts from `url`, scrolling until a scroll no longer
/// grows the number of rendered candidate elements.
///
/// `target` only names the JSON dump written when `options.dump_dir` is set.
pub async fn scrape_until_idle<B>(
    browser: &mut B,
    url: &Url,
    target: &str,
    harvest: Harvest,
    options: &ScrapeOptions,
) -> Result<Vec<String>>
where
    B: Browser + ?Sized,
{
    tracing::info!("Scraping {} from {}", harvest, url);
    let locator = harvest.locator();
    browser.navigate(url.as_str()).await?;
    browser
        .wait_until_present(locator, options.wait_timeout, options.poll_interval)
        .await?;

    let mut collected = Collected::default();
    let elements = browser.find_all(locator).await?;
    collected.absorb(&elements, harvest, options);
    let mut rendered = elements.len();

    loop {
        browser.scroll_to_bottom().await?;
        sleep(options.settle_delay).await;

        let elements = browser.find_all(locator).await?;
        collected.absorb(&elements, harvest, options);
        if elements.len() <= rendered {
            break;
        }
        rendered = elements.len();
    }

    tracing::info!("Collected {} {} from {}", collected.items.len(), harvest, url);
    if let Some(dir) = &options.dump_dir {
        match dump(dir, harvest, target, &collected.items).await {
            Ok(path) => tracing::debug!("Dumped {} of {} to {}", harvest, target, path.display()),
            Err(e) => tracing::warn!("Cannot dump {} of {} to {}: {}", harvest, target, dir.display(), e),
        }
    }
    Ok(collected.items)
}

/// Running union of kept texts, in discovery order.
#[derive(Debug, Default)]
struct Collected {
    seen: HashSet<String>,
    items: Vec<String>,
}

impl Collected {
    fn absorb(&mut self, elements: &[Element], harvest: Harvest, options: &ScrapeOptions) {
        for text in elements.iter().filter_map(|e| e.text.as_deref()).map(str::trim) {
            if harvest.keeps(text, options) && self.seen.insert(text.to_string()) {
                self.items.push(text.to_string());
            }
        }
    }
}

async fn dump(dir: &Path, harvest: Harvest, target: &str, items: &[String]) -> Result<PathBuf> {
    let time = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("x_{}_{}_{}.json", harvest, file_stem(target), time));
    tokio::fs::write(&path, serde_json::to_string_pretty(items)?).await?;
    Ok(path)
}

/// `@some.user` → `some_user`
pub(crate) fn file_stem(target: &str) -> String {
    target
        .trim_start_matches(ACCOUNT_MARKER)
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
