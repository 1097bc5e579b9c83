use url::Url;

use crate::error::Result;

pub const BASE_URL: &str = "https://x.com";
pub const LOGIN_URL: &str = "https://x.com/login";
pub const HOME_URL: &str = "https://x.com/home";
pub const SEARCH_URL: &str = "https://x.com/search";

pub const DEFAULT_SEARCH_LANGUAGE: &str = "nl";
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 3000;
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Search view listing the posts and replies authored by `username`.
pub fn search_url(username: &str, language: &str) -> Result<Url> {
    let query = format!("from:{}", username);
    let params = [("l", ""), ("q", query.as_str()), ("src", "typd"), ("lang", language)];
    Ok(Url::parse_with_params(SEARCH_URL, &params)?)
}

pub fn profile_url(username: &str) -> String {
    format!("{}/{}", BASE_URL, username)
}

pub fn followers_url(profile_url: &str) -> Result<Url> {
    Ok(Url::parse(&format!("{}/followers", profile_url.trim_end_matches('/')))?)
}
