use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Response error:\nStatusCode: {0}\nText: {1}")]
    Status(reqwest::StatusCode, String),

    #[error("Failed to deserialize response: {0}")]
    Deserialize(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Malformed listing entry: {0}")]
    Listing(String),
}
