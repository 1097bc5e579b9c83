use std::collections::{BTreeMap, BTreeSet};

use x_client::{profile_url, Browser, ScrapeOptions};

use crate::collector::{Collector, Failure};
use crate::detector::{detect, DEFAULT_SIMILARITY_THRESHOLD};
use crate::model::{Field, MatchEntry};
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct Settings {
    pub similarity_threshold: f64,
    pub scrape: ScrapeOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            scrape: ScrapeOptions::default(),
        }
    }
}

/// Result of one run against a main user.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub target: String,
    pub main_user_replies: Vec<String>,
    pub followers: BTreeSet<String>,
    pub follower_replies: BTreeMap<String, Vec<String>>,
    pub similar_replies: BTreeMap<String, Vec<MatchEntry>>,
    pub failures: Vec<Failure>,
}

impl Analysis {
    pub fn failed(&self, username: &str, field: Field) -> bool {
        self.failures.iter().any(|f| f.username == username && f.field == field)
    }

    /// Write the results into `store`.
    ///
    /// Fields of targets that failed to scrape are left unset so the next run
    /// tries again. `similar_replies` of the target is always replaced.
    pub fn merge_into(&self, store: &mut Store) {
        let target = &self.target;
        let followers_failed = self.failed(target, Field::Followers);
        let replies_failed = self.failed(target, Field::MainUserReplies);

        let record = store.record_mut(target);
        if !followers_failed {
            record.followers = Some(self.followers.clone());
        }
        if !replies_failed {
            record.main_user_replies = Some(self.main_user_replies.clone());
        }
        record.similar_replies = Some(self.similar_replies.clone());

        for (follower, replies) in &self.follower_replies {
            if self.failed(follower, Field::Replies) {
                continue;
            }
            store.record_mut(follower).replies = Some(replies.clone());
        }
    }
}

/// Collect the main user's replies and followers, each follower's replies, and
/// compare them. Nothing is written to `store`; see [`Analysis::merge_into`].
pub async fn analyze<B>(browser: &mut B, store: &Store, target: &str, settings: &Settings) -> Analysis
where
    B: Browser + ?Sized,
{
    let mut collector = Collector::new(browser, &settings.scrape);
    let main_user_replies = collector.collect_main_replies(target, store).await;
    let followers = collector.collect_followers(target, &profile_url(target), store).await;
    let follower_replies = collector.collect_follower_replies(&followers, store).await;
    let failures = collector.into_failures();

    let similar_replies = detect(&main_user_replies, &follower_replies, settings.similarity_threshold);
    tracing::info!(
        "{} of {} followers of {} have replies similar to theirs",
        similar_replies.len(),
        followers.len(),
        target
    );
    if !failures.is_empty() {
        tracing::warn!("{} targets could not be scraped and will be retried next run", failures.len());
    }

    Analysis {
        target: target.to_string(),
        main_user_replies,
        followers,
        follower_replies,
        similar_replies,
        failures,
    }
}
