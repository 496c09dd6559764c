use std::path::Path;

use color_eyre::eyre::Result;
use serde::Deserialize;

use crate::config::AudioFormat;

/// Which search the resolver should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// Generic video search; entries may link into a playlist
    Videos,
    /// Search restricted to playlists; entry ids are playlist ids
    Playlists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub kind: SearchKind,
    pub terms: String,
    pub limit: usize,
}

/// One entry of a search result or playlist listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResolverEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Port trait wrapping the media resolver capabilities used by the pipeline.
///
/// Implementations live in `services::youtube::ytdlp` (production) or test mocks.
/// Member listings keep `None` for entries the resolver could not describe, so
/// callers can still count them.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MediaResolver: Send + Sync {
    async fn search(&self, query: &SearchQuery, flat: bool) -> Result<Vec<ResolverEntry>>;

    async fn resolve_playlist_members(
        &self,
        playlist_url: &str,
        flat: bool,
    ) -> Result<Vec<Option<ResolverEntry>>>;

    /// Fetch the best audio for `video_url` and transcode it to
    /// `<output_base>.<extension>`.
    async fn fetch_audio(
        &self,
        video_url: &str,
        output_base: &Path,
        format: &AudioFormat,
    ) -> Result<()>;
}
