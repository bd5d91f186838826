use reqwest::header::InvalidHeaderValue;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors at the HTTP boundary.
///
/// The cache collapses all of these into an `Error` status; the variants only
/// matter for logs and CLI output.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("invalid API url {url}: {source}")]
  InvalidUrl {
    url: String,
    #[source]
    source: url::ParseError,
  },

  #[error("API token is not a valid header value")]
  InvalidToken(#[from] InvalidHeaderValue),

  #[error("failed to create HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("request to {url} failed: {source}")]
  Transport {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{url} returned {status}")]
  Status { url: String, status: StatusCode },

  #[error("malformed response from {url}: {source}")]
  Decode {
    url: String,
    #[source]
    source: serde_json::Error,
  },
}
