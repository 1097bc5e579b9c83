use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use copycat_core::{Settings, DEFAULT_SIMILARITY_THRESHOLD};
use copycat_util::DEFAULT_MIN_REPLY_LENGTH;
use x_client::{
    Credentials, LaunchOptions, ScrapeOptions, DEFAULT_SEARCH_LANGUAGE, DEFAULT_SETTLE_DELAY_MS,
    DEFAULT_WAIT_TIMEOUT_SECS,
};

/// Flag followers whose replies closely resemble a user's own replies.
///
/// Every option can also be set through the environment or a `.env` file.
#[derive(Parser)]
#[command(name = "copycat", version)]
pub struct Config {
    /// Account to analyze; asked for on stdin if omitted
    pub username: Option<String>,

    /// JSON file holding everything scraped so far
    #[arg(long, env = "COPYCAT_CACHE_PATH", default_value = "followers_data.json")]
    pub cache_path: PathBuf,

    #[arg(long, env = "X_EMAIL")]
    pub email: Option<String>,
    /// Handle asked for by the login flow, e.g. `@me`
    #[arg(long, env = "X_HANDLE")]
    pub handle: Option<String>,
    #[arg(long, env = "X_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,
    #[arg(long, env = "COPYCAT_HEADLESS")]
    pub headless: bool,

    /// Replies scoring above this are reported
    #[arg(long, env = "COPYCAT_SIMILARITY_THRESHOLD", default_value_t = DEFAULT_SIMILARITY_THRESHOLD, value_parser = parse_ratio)]
    pub similarity_threshold: f64,
    /// Shorter replies are ignored
    #[arg(long, env = "COPYCAT_MIN_REPLY_LENGTH", default_value_t = DEFAULT_MIN_REPLY_LENGTH)]
    pub min_reply_length: usize,
    #[arg(long, env = "COPYCAT_SEARCH_LANGUAGE", default_value = DEFAULT_SEARCH_LANGUAGE)]
    pub search_language: String,

    /// Pause after each scroll and form submission
    #[arg(long, env = "COPYCAT_SETTLE_DELAY_MS", default_value_t = DEFAULT_SETTLE_DELAY_MS)]
    pub settle_delay_ms: u64,
    /// How long to wait for a page to render its first element
    #[arg(long, env = "COPYCAT_WAIT_TIMEOUT_SECS", default_value_t = DEFAULT_WAIT_TIMEOUT_SECS)]
    pub wait_timeout_secs: u64,
    /// Extra attempts for a page that failed to load
    #[arg(long, env = "COPYCAT_RETRIES", default_value_t = 0)]
    pub retries: usize,

    #[arg(long, env = "COPYCAT_LOG_FILE", default_value = "twitter_scraper.log")]
    pub log_file: PathBuf,
}

impl Config {
    /// Login credentials, if all of them are configured.
    pub fn credentials(&self) -> Option<Credentials> {
        Some(Credentials {
            email: self.email.clone()?,
            handle: self.handle.clone()?,
            password: self.password.clone()?,
        })
    }

    pub fn settings(&self) -> Settings {
        Settings {
            similarity_threshold: self.similarity_threshold,
            scrape: ScrapeOptions {
                settle_delay: Duration::from_millis(self.settle_delay_ms),
                wait_timeout: Duration::from_secs(self.wait_timeout_secs),
                retries: self.retries,
                min_reply_length: self.min_reply_length,
                search_language: self.search_language.clone(),
                ..Default::default()
            },
        }
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            executable: self.chrome_path.clone(),
            headless: self.headless,
        }
    }
}

fn parse_ratio(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("`{}` is not a number", s))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is not between 0 and 1", value))
    }
}
