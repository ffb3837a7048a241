use thiserror::Error;

use crate::client::HttpResponse;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response whose status the retry policy treats as transient
    /// (429 and most 5xx). Carries the response so it can still be handed
    /// back once retries are exhausted.
    #[error("transient HTTP status {status} from {url}", status = .response.status, url = .response.final_url)]
    TransientStatus { response: HttpResponse },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid HTTP client configuration: {0}")]
    InvalidConfig(String),
}
