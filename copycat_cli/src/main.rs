mod config;
mod logging;

use anyhow::bail;
use clap::Parser;
use dotenvy::dotenv;
use std::io::{BufRead, Write};

use copycat_core::{analyze, Analysis, Settings, Store};
use x_client::{login, Browser, ChromeBrowser, Credentials};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Config::parse();

    // 1. Initialize logger
    let _log_guard = logging::init(&config.log_file)?;

    // 2. Read target
    let username = match &config.username {
        Some(username) => username.trim().to_string(),
        None => prompt_username()?,
    };
    if username.is_empty() {
        bail!("No username given");
    }

    // 3. Load cache; a corrupt cache aborts the run
    let mut store = Store::load(&config.cache_path)?;

    // 4. Start browser session
    let mut browser = ChromeBrowser::launch(&config.launch_options()).await?;

    // 5. Collect, compare and merge
    let settings = config.settings();
    let analysis = run(&mut browser, &store, &username, config.credentials().as_ref(), &settings).await;
    analysis.merge_into(&mut store);
    report(&analysis);

    // 6. Release browser session
    if let Err(e) = browser.close().await {
        tracing::warn!("Cannot close browser: {}", e);
    }

    // 7. Save cache; a failed save loses this run but is not fatal
    match store.save(&config.cache_path) {
        Ok(()) => tracing::info!("Data has been updated successfully!"),
        Err(e) => tracing::error!("An error occurred while updating the cache: {}", e),
    }
    Ok(())
}

async fn run<B: Browser>(
    browser: &mut B,
    store: &Store,
    username: &str,
    credentials: Option<&Credentials>,
    settings: &Settings,
) -> Analysis {
    match credentials {
        Some(credentials) => {
            if let Err(e) = login(browser, credentials, &settings.scrape).await {
                tracing::warn!("Login failed or additional steps required: {}", e);
            }
        }
        None => tracing::warn!("No credentials configured, scraping without signing in"),
    }
    analyze(browser, store, username, settings).await
}

fn report(analysis: &Analysis) {
    for (follower, matches) in &analysis.similar_replies {
        let best = matches.iter().map(|m| m.similarity_score).fold(0.0, f64::max);
        tracing::info!("{} has {} similar replies (best score {:.2})", follower, matches.len(), best);
    }
    for failure in &analysis.failures {
        tracing::warn!("Missing {} of {}: {}", failure.field, failure.username, failure.error);
    }
}

fn prompt_username() -> anyhow::Result<String> {
    print!("Enter the username of the main user: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
