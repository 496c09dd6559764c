use color_eyre::eyre::Result;

/// Port trait for fetching the platform's raw search results page.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchPage: Send + Sync {
    /// Returns the page body for `terms`, filtered to playlists.
    async fn fetch_playlist_results(&self, terms: &str) -> Result<String>;
}
