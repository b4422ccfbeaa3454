use reqwest::Client;

use stripdex_cluster::Comic;

use crate::error::FetchError;

/// Default comic API base URL.
pub const DEFAULT_BASE_URL: &str = "https://xkcd.com";

/// ComicClient fetches one comic metadata record per comic number.
///
/// Records are served as JSON at `<base>/<num>/info.0.json`. The base
/// URL is injectable for tests and mirrors. The client does not retry:
/// a failed fetch is reported to the caller and the record is dropped.
pub struct ComicClient {
    client: Client,
    base_url: String,
}

impl ComicClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Metadata URL for comic number `num`.
    pub fn comic_url(&self, num: u32) -> String {
        format!("{}/{}/info.0.json", self.base_url, num)
    }

    /// Fetch and decode the record for comic number `num`.
    pub async fn comic(&self, num: u32) -> Result<Comic, FetchError> {
        let resp = self.client.get(self.comic_url(num)).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl Default for ComicClient {
    fn default() -> Self {
        Self::new()
    }
}
