use std::collections::{BTreeMap, BTreeSet};

use x_client::{Browser, ScrapeOptions};

use crate::model::Field;
use crate::store::Store;

/// A target that could not be scraped in this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub username: String,
    pub field: Field,
    pub error: String,
}

/// Collects replies and followers, reusing whatever the store already has.
///
/// Fields already present in the store are never fetched again. A target that
/// fails to scrape is logged, yields an empty result and is listed in
/// [`Collector::failures`].
pub struct Collector<'a, B: Browser + ?Sized> {
    browser: &'a mut B,
    options: &'a ScrapeOptions,
    failures: Vec<Failure>,
}

impl<'a, B: Browser + ?Sized> Collector<'a, B> {
    pub fn new(browser: &'a mut B, options: &'a ScrapeOptions) -> Self {
        Self {
            browser,
            options,
            failures: Vec::new(),
        }
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }

    pub async fn collect_main_replies(&mut self, username: &str, store: &Store) -> Vec<String> {
        if let Some(replies) = store.get(username).and_then(|r| r.main_user_replies.as_ref()) {
            tracing::info!("Replies for {} already exist. Skipping scraping.", username);
            return replies.clone();
        }
        let result = x_client::scrape_replies(&mut *self.browser, username, self.options).await;
        self.settle(username, Field::MainUserReplies, result)
    }

    pub async fn collect_followers(&mut self, username: &str, profile_url: &str, store: &Store) -> BTreeSet<String> {
        if let Some(followers) = store.get(username).and_then(|r| r.followers.as_ref()) {
            tracing::info!("Followers for {} already exist. Skipping scraping.", username);
            return followers.clone();
        }
        let result = x_client::scrape_followers(&mut *self.browser, profile_url, self.options).await;
        self.settle(username, Field::Followers, result).into_iter().collect()
    }

    pub async fn collect_follower_replies<I, S>(&mut self, followers: I, store: &Store) -> BTreeMap<String, Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut all_replies = BTreeMap::new();
        for follower in followers {
            let follower = follower.as_ref();
            if let Some(replies) = store.get(follower).and_then(|r| r.replies.as_ref()) {
                tracing::info!("Replies for {} already exist. Skipping scraping.", follower);
                all_replies.insert(follower.to_string(), replies.clone());
                continue;
            }
            let result = x_client::scrape_replies(&mut *self.browser, follower, self.options).await;
            let replies = self.settle(follower, Field::Replies, result);
            all_replies.insert(follower.to_string(), replies);
        }
        all_replies
    }

    fn settle<T: Default>(&mut self, username: &str, field: Field, result: x_client::Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("An error occurred while scraping {} of {}: {}", field, username, e);
                self.failures.push(Failure {
                    username: username.to_string(),
                    field,
                    error: e.to_string(),
                });
                T::default()
            }
        }
    }
}
