//! A scripted in-memory browser.
//!
//! Each page is a list of frames; `find_all` returns the current frame and each
//! scroll advances to the next one, staying on the last frame once the script
//! runs out. Navigating resets the page to its first frame. Unknown pages render
//! nothing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use crate::browser::{Browser, Element, Locator};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct FakeBrowser {
    pages: HashMap<String, Vec<Vec<Element>>>,
    failing: HashSet<String>,
    redirect: Option<(usize, String)>,
    current: Option<String>,
    frame: usize,

    pub navigations: Vec<String>,
    pub scrolls: usize,
    pub typed: Vec<(String, String)>,
    pub submitted: Vec<String>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `url` with frames of element texts.
    pub fn with_page<S: AsRef<str>>(self, url: impl Into<String>, frames: Vec<Vec<S>>) -> Self {
        let frames = frames
            .into_iter()
            .map(|frame| frame.iter().map(|s| Element::new(s.as_ref())).collect())
            .collect();
        self.with_frames(url, frames)
    }

    pub fn with_frames(mut self, url: impl Into<String>, frames: Vec<Vec<Element>>) -> Self {
        self.pages.insert(url.into(), frames);
        self
    }

    /// Make every navigation to `url` fail.
    pub fn with_failure(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    /// Move to `url` once `submits` forms have been submitted, as a successful login would.
    pub fn with_redirect(mut self, submits: usize, url: impl Into<String>) -> Self {
        self.redirect = Some((submits, url.into()));
        self
    }

    /// Number of navigations to `url`.
    pub fn visits(&self, url: &str) -> usize {
        self.navigations.iter().filter(|u| u.as_str() == url).count()
    }

    fn current_frame(&self) -> Vec<Element> {
        self.current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .and_then(|frames| frames.get(self.frame.min(frames.len().saturating_sub(1))))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.navigations.push(url.to_string());
        if self.failing.contains(url) {
            return Err(Error::Navigation(format!("{}: unreachable", url)));
        }
        self.current = Some(url.to_string());
        self.frame = 0;
        Ok(())
    }

    async fn find_all(&mut self, _locator: &Locator) -> Result<Vec<Element>> {
        Ok(self.current_frame())
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.scrolls += 1;
        self.frame += 1;
        Ok(())
    }

    async fn current_url(&mut self) -> Result<Option<String>> {
        Ok(self.current.clone())
    }

    async fn type_into(&mut self, selector: &str, text: &str) -> Result<()> {
        if self.current_frame().is_empty() {
            return Err(Error::ElementNotFound(selector.to_string()));
        }
        self.typed.push((selector.to_string(), text.to_string()));
        Ok(())
    }

    async fn submit(&mut self, selector: &str) -> Result<()> {
        self.submitted.push(selector.to_string());
        if let Some((submits, url)) = &self.redirect {
            if self.submitted.len() == *submits {
                self.current = Some(url.clone());
                self.frame = 0;
            }
        }
        Ok(())
    }
}
