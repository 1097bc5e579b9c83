use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum Error {
    #[error("Navigation error: {0}")]
    Navigation(String),
    #[error("Timed out waiting for `{0}`")]
    Timeout(String),
    #[error("Element `{0}` not found")]
    ElementNotFound(String),
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Cannot launch browser: {0}")]
    Launch(String),
    #[error("Browser error: {0}")]
    BrowserError(#[from] chromiumoxide::error::CdpError),
    #[error("Cannot encode/decode JSON: {0}")]
    JSONError(#[from] serde_json::Error),
    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Cannot parse URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl Error {
    /// Whether another attempt at the same page may succeed.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Error::Navigation(_) | Error::Timeout(_) | Error::ElementNotFound(_) | Error::BrowserError(_)
        )
    }
}
