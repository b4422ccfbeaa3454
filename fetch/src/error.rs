use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("fetch: request failed: {0}")]
    Http(String),

    #[error("fetch: unexpected status {0}")]
    Status(u16),

    #[error("fetch: decode failed: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Http(e.to_string())
    }
}
