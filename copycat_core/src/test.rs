use std::collections::{BTreeMap, BTreeSet};

use x_client::fake::FakeBrowser;
use x_client::{profile_url, search_url, ScrapeOptions, DEFAULT_SEARCH_LANGUAGE};

use crate::analysis::{analyze, Settings};
use crate::collector::Collector;
use crate::detector::{detect, DEFAULT_SIMILARITY_THRESHOLD};
use crate::error::Error;
use crate::model::*;
use crate::store::Store;

fn search(username: &str) -> String {
    search_url(username, DEFAULT_SEARCH_LANGUAGE).unwrap().to_string()
}

fn followers_page(username: &str) -> String {
    format!("{}/followers", profile_url(username))
}

fn settings() -> Settings {
    Settings {
        scrape: ScrapeOptions::immediate(),
        ..Default::default()
    }
}

fn store_from(json: &str) -> Store {
    serde_json::from_str(json).unwrap()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// MARK: Collector

#[tokio::test]
async fn test_cached_follower_replies_skip_browser() {
    let store = store_from(r#"{"alice": {"replies": ["r1"]}}"#);
    let mut browser = FakeBrowser::new();
    let options = ScrapeOptions::immediate();
    let mut collector = Collector::new(&mut browser, &options);

    let replies = collector.collect_follower_replies(["alice"], &store).await;

    assert_eq!(replies, BTreeMap::from([("alice".to_string(), strings(&["r1"]))]));
    assert!(collector.failures().is_empty());
    assert!(browser.navigations.is_empty());
}

#[tokio::test]
async fn test_cached_main_user_data_skip_browser() {
    let store = store_from(r#"{"alice": {"followers": ["@bob"], "main_user_replies": ["cached reply"]}}"#);
    let mut browser = FakeBrowser::new();
    let options = ScrapeOptions::immediate();
    let mut collector = Collector::new(&mut browser, &options);

    let replies = collector.collect_main_replies("alice", &store).await;
    let followers = collector.collect_followers("alice", &profile_url("alice"), &store).await;

    assert_eq!(replies, strings(&["cached reply"]));
    assert_eq!(followers, BTreeSet::from(["@bob".to_string()]));
    assert!(browser.navigations.is_empty());
}

#[tokio::test]
async fn test_main_user_replies_are_not_follower_replies() {
    // A record scraped as a follower has `replies`, not `main_user_replies`
    let store = store_from(r#"{"alice": {"replies": ["an old follower reply"]}}"#);
    let mut browser = FakeBrowser::new().with_page(search("alice"), vec![vec!["a fresh main user reply"]]);
    let options = ScrapeOptions::immediate();
    let mut collector = Collector::new(&mut browser, &options);

    let replies = collector.collect_main_replies("alice", &store).await;

    assert_eq!(replies, strings(&["a fresh main user reply"]));
    assert_eq!(browser.visits(&search("alice")), 1);
}

#[tokio::test]
async fn test_uncached_followers_are_scraped_and_deduplicated() {
    let store = Store::new();
    let frames = vec![vec!["@carol", "@bob"], vec!["@carol", "@bob", "@bob", "Carol"]];
    let mut browser = FakeBrowser::new().with_page(followers_page("alice"), frames);
    let options = ScrapeOptions::immediate();
    let mut collector = Collector::new(&mut browser, &options);

    let followers = collector.collect_followers("alice", &profile_url("alice"), &store).await;

    assert_eq!(followers, BTreeSet::from(["@bob".to_string(), "@carol".to_string()]));
}

#[tokio::test]
async fn test_failed_target_degrades_to_empty() {
    let store = Store::new();
    let mut browser = FakeBrowser::new()
        .with_page(search("@bob"), vec![vec!["bob says something"]])
        .with_failure(search("@carol"));
    let options = ScrapeOptions::immediate();
    let mut collector = Collector::new(&mut browser, &options);

    let replies = collector.collect_follower_replies(["@carol", "@bob"], &store).await;

    assert_eq!(replies["@bob"], strings(&["bob says something"]));
    assert!(replies["@carol"].is_empty());
    let failures = collector.into_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].username, "@carol");
    assert_eq!(failures[0].field, Field::Replies);
}

// MARK: Detector

#[test]
fn test_detect_flags_close_reply() {
    let main = strings(&["the quick brown fox"]);
    let all = BTreeMap::from([("bob".to_string(), strings(&["the quick brown fox jumps"]))]);

    let result = detect(&main, &all, DEFAULT_SIMILARITY_THRESHOLD);

    let matches = &result["bob"];
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].main_user_reply, "the quick brown fox");
    assert_eq!(matches[0].follower_reply, "the quick brown fox jumps");
    assert!((matches[0].similarity_score - 38.0 / 44.0).abs() < 1e-9);
}

#[test]
fn test_detect_omits_followers_without_matches() {
    let main = strings(&["the quick brown fox"]);
    let all = BTreeMap::from([
        ("carol".to_string(), strings(&["completely unrelated text"])),
        ("dave".to_string(), vec![]),
    ]);

    let result = detect(&main, &all, DEFAULT_SIMILARITY_THRESHOLD);

    assert!(result.is_empty());
}

#[test]
fn test_detect_keeps_discovery_order() {
    let main = strings(&["I really love this new song", "I really love this new album"]);
    let all = BTreeMap::from([(
        "bob".to_string(),
        strings(&["I really love this new album!", "nothing alike at all here", "I really love this new song!"]),
    )]);

    let result = detect(&main, &all, DEFAULT_SIMILARITY_THRESHOLD);

    let pairs: Vec<_> = result["bob"]
        .iter()
        .map(|m| (m.follower_reply.as_str(), m.main_user_reply.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("I really love this new album!", "I really love this new song"),
            ("I really love this new album!", "I really love this new album"),
            ("I really love this new song!", "I really love this new song"),
            ("I really love this new song!", "I really love this new album"),
        ]
    );
}

#[test]
fn test_detect_threshold_is_strict() {
    let main = strings(&["exactly the same reply"]);
    let all = BTreeMap::from([("bob".to_string(), strings(&["exactly the same reply"]))]);

    assert!(detect(&main, &all, 1.0).is_empty());
    assert_eq!(detect(&main, &all, 0.99)["bob"].len(), 1);
}

// MARK: Store

#[test]
fn test_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("followers_data.json");
    let store = store_from(
        r#"{
            "alice": {
                "followers": ["@bob", "@carol"],
                "main_user_replies": ["שלום לכולם, מה נשמע?", "Ça va très bien 🙂"],
                "similar_replies": {
                    "@bob": [{"main_user_reply": "a", "follower_reply": "b", "similarity_score": 0.8636363636363636}]
                }
            },
            "@bob": {"replies": ["b"]}
        }"#,
    );

    store.save(&path).unwrap();
    let loaded = Store::load(&path).unwrap();

    assert_eq!(loaded, store);
}

#[test]
fn test_store_writes_readable_unicode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    let mut store = Store::new();
    store.record_mut("@bob").replies = Some(strings(&["שלום עולם"]));

    store.save(&path).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();

    assert!(content.contains("שלום עולם"));
    assert!(content.contains("\n    \"@bob\": {\n        \"replies\": ["));
    assert!(!dir.path().join("data.json.tmp").exists());
}

#[test]
fn test_store_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();

    let store = Store::load(dir.path().join("absent.json")).unwrap();

    assert!(store.is_empty());
}

#[test]
fn test_store_corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = Store::load(&path);

    assert!(matches!(result, Err(Error::JSONError(ref p, _)) if p == &path));
}

#[test]
fn test_store_save_to_missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("data.json");

    let result = Store::new().save(&path);

    assert!(matches!(result, Err(Error::IOError(..))));
}

#[test]
fn test_store_keeps_unknown_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    let store = store_from(r#"{"alice": {"notes": {"flagged": true}, "replies": ["hello there friends"]}}"#);

    store.save(&path).unwrap();
    let loaded = Store::load(&path).unwrap();

    let record = loaded.get("alice").unwrap();
    assert_eq!(record.extra["notes"], serde_json::json!({"flagged": true}));
    assert!(loaded.has_field("alice", Field::Replies));
    assert!(!loaded.has_field("alice", Field::Followers));
    assert!(!loaded.has_field("nobody", Field::Replies));
}

// MARK: Analysis

fn scripted_browser() -> FakeBrowser {
    FakeBrowser::new()
        .with_page(
            search("alice"),
            vec![vec!["the quick brown fox", "an original thought of mine"]],
        )
        .with_page(followers_page("alice"), vec![vec!["@bob", "@carol", "@dave"]])
        .with_page(search("@bob"), vec![vec!["the quick brown fox jumps"]])
        .with_page(search("@carol"), vec![vec!["completely unrelated text"]])
        .with_failure(search("@dave"))
}

#[tokio::test]
async fn test_analyze_and_merge() {
    let mut browser = scripted_browser();
    let mut store = Store::new();

    let analysis = analyze(&mut browser, &store, "alice", &settings()).await;
    analysis.merge_into(&mut store);

    let alice = store.get("alice").unwrap();
    assert_eq!(
        alice.main_user_replies,
        Some(strings(&["the quick brown fox", "an original thought of mine"]))
    );
    assert_eq!(alice.followers.as_ref().map(|f| f.len()), Some(3));
    let similar = alice.similar_replies.as_ref().unwrap();
    assert_eq!(similar.keys().collect::<Vec<_>>(), vec!["@bob"]);
    assert_eq!(similar["@bob"][0].follower_reply, "the quick brown fox jumps");

    assert_eq!(store.get("@bob").unwrap().replies, Some(strings(&["the quick brown fox jumps"])));
    assert!(store.has_field("@carol", Field::Replies));
    // A failed scrape must not be cached, or it would never be retried
    assert!(!store.has_field("@dave", Field::Replies));
    assert!(analysis.failed("@dave", Field::Replies));
}

#[tokio::test]
async fn test_second_run_only_retries_failed_targets() {
    let mut store = Store::new();
    let mut first = scripted_browser();
    analyze(&mut first, &store, "alice", &settings()).await.merge_into(&mut store);

    let mut second = FakeBrowser::new().with_page(search("@dave"), vec![vec!["dave is back online"]]);
    let analysis = analyze(&mut second, &store, "alice", &settings()).await;
    analysis.merge_into(&mut store);

    assert_eq!(second.navigations, vec![search("@dave")]);
    assert!(analysis.failures.is_empty());
    assert_eq!(store.get("@dave").unwrap().replies, Some(strings(&["dave is back online"])));
    assert!(store.get("alice").unwrap().similar_replies.as_ref().unwrap().contains_key("@bob"));
}

#[tokio::test]
async fn test_merge_never_removes_fields() {
    let mut store = store_from(
        r#"{
            "alice": {"replies": ["alice once followed someone"]},
            "@bob": {"followers": ["@zed"], "similar_replies": {}}
        }"#,
    );
    let mut browser = scripted_browser();

    analyze(&mut browser, &store, "alice", &settings()).await.merge_into(&mut store);

    let alice = store.get("alice").unwrap();
    assert_eq!(alice.replies, Some(strings(&["alice once followed someone"])));
    assert!(alice.main_user_replies.is_some());
    let bob = store.get("@bob").unwrap();
    assert!(bob.has(Field::Followers));
    assert!(bob.has(Field::SimilarReplies));
    assert!(bob.has(Field::Replies));
}

#[tokio::test]
async fn test_failed_main_user_scrape_is_not_cached() {
    let mut browser = FakeBrowser::new().with_failure(search("alice"));
    let mut store = Store::new();

    let analysis = analyze(&mut browser, &store, "alice", &settings()).await;
    analysis.merge_into(&mut store);

    let alice = store.get("alice").unwrap();
    assert!(alice.main_user_replies.is_none());
    // The followers page rendered nothing, so it timed out as well
    assert!(alice.followers.is_none());
    assert_eq!(alice.similar_replies, Some(BTreeMap::new()));
}

#[tokio::test]
async fn test_nothing_is_persisted_before_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    Store::new().save(&path).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let mut store = Store::load(&path).unwrap();
    let mut browser = scripted_browser();
    analyze(&mut browser, &store, "alice", &settings()).await.merge_into(&mut store);

    // There is no checkpointing: a crash at this point would lose the whole run
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    store.save(&path).unwrap();
    assert_eq!(Store::load(&path).unwrap(), store);
}
