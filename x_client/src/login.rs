use std::fmt::{Debug, Formatter};
use tokio::time::sleep;

use crate::browser::{Browser, Locator};
use crate::consts::{HOME_URL, LOGIN_URL};
use crate::error::{Error, Result};
use crate::scrape::ScrapeOptions;
use crate::selectors;

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub handle: String,
    pub password: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("handle", &self.handle)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sign in through the login form. Succeeds only if the browser ends up on the home timeline.
pub async fn login<B>(browser: &mut B, credentials: &Credentials, options: &ScrapeOptions) -> Result<()>
where
    B: Browser + ?Sized,
{
    tracing::info!("Navigating to login page...");
    browser.navigate(LOGIN_URL).await?;

    let steps = [
        (selectors::login::EMAIL, &credentials.email),
        (selectors::login::HANDLE, &credentials.handle),
        (selectors::login::PASSWORD, &credentials.password),
    ];
    for (selector, value) in steps {
        browser
            .wait_until_present(&Locator::new(selector), options.wait_timeout, options.poll_interval)
            .await?;
        browser.type_into(selector, value).await?;
        browser.submit(selector).await?;
        sleep(options.settle_delay).await;
    }

    match browser.current_url().await? {
        Some(url) if url == HOME_URL => {
            tracing::info!("Login successful");
            Ok(())
        }
        url => Err(Error::Authentication(format!(
            "expected {} after login, landed on {}",
            HOME_URL,
            url.as_deref().unwrap_or("nothing")
        ))),
    }
}
