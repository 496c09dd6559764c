use std::sync::LazyLock;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use regex::Regex;
use reqwest::Client;

use crate::ports::search_page::SearchPage;
use crate::services::youtube::urls;

static LIST_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"list=([A-Za-z0-9_-]+)").expect("valid playlist id regex"));

/// Fetches the public results page the way a browser would.
pub struct YoutubeSearchPage {
    client: Client,
}

impl YoutubeSearchPage {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .wrap_err("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl SearchPage for YoutubeSearchPage {
    async fn fetch_playlist_results(&self, terms: &str) -> Result<String> {
        let url = urls::playlist_results_url(terms);
        log::debug!("Fetching search page: {}", url);
        let body = self
            .client
            .get(&url)
            .send()
            .await
            .wrap_err_with(|| format!("Failed to send search request to {}", url))?
            .error_for_status()
            .wrap_err_with(|| format!("Search page returned an error status: {}", url))?
            .text()
            .await
            .wrap_err_with(|| format!("Failed to read search page body from {}", url))?;
        Ok(body)
    }
}

/// Every distinct `list=<id>` in `body`, in order of first appearance,
/// capped at `cap`.
pub fn extract_playlist_ids(body: &str, cap: usize) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for captures in LIST_ID.captures_iter(body) {
        if ids.len() >= cap {
            break;
        }
        let id = &captures[1];
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
    ids
}
