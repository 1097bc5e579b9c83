mod browser;
mod chrome;
mod consts;
mod error;
#[cfg(any(test, feature = "fake"))]
pub mod fake;
mod login;
mod scrape;
pub mod selectors;

pub use browser::{Browser, Element, Locator};
pub use chrome::{ChromeBrowser, LaunchOptions};
pub use consts::*;
pub use error::{Error, Result};
pub use login::{login, Credentials};
pub use scrape::{scrape_followers, scrape_replies, scrape_until_idle, Harvest, ScrapeOptions};
