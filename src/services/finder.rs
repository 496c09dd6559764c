use color_eyre::eyre::Result;

use crate::config::SearchConfig;
use crate::playlist::{Playlist, PlaylistSet};
use crate::ports::resolver::{MediaResolver, SearchKind, SearchQuery};
use crate::ports::search_page::SearchPage;
use crate::services::youtube::search_page::extract_playlist_ids;
use crate::services::youtube::urls;

/// Looks up playlists for a keyword through the resolver, falling back to
/// scraping the raw results page when the resolver fails.
pub struct PlaylistFinder<'a, R: MediaResolver, P: SearchPage> {
    resolver: &'a R,
    search_page: &'a P,
    config: &'a SearchConfig,
}

impl<'a, R: MediaResolver, P: SearchPage> PlaylistFinder<'a, R, P> {
    pub fn new(resolver: &'a R, search_page: &'a P, config: &'a SearchConfig) -> Self {
        Self {
            resolver,
            search_page,
            config,
        }
    }

    /// Never fails: resolver errors trigger the fallback and fallback errors
    /// yield an empty list. Playlists found before a resolver error are kept
    /// and merged with the fallback results.
    pub async fn find_playlists(&self, keyword: &str) -> Vec<Playlist> {
        log::info!("Searching playlists for keyword '{}'", keyword);
        let mut found = PlaylistSet::new();

        match self.search_with_resolver(keyword, &mut found).await {
            Ok(()) => {
                log::info!("Found {} playlists", found.len());
                return found.into_vec();
            }
            Err(e) => log::error!("Playlist search failed: {:#}", e),
        }

        log::info!(
            "Trying the raw search page instead ({} playlists kept so far)",
            found.len()
        );
        match self.search_with_page(keyword).await {
            Ok(playlists) => {
                let added = found.extend(playlists);
                log::info!("Found {} more playlists on the search page", added);
                found.into_vec()
            }
            Err(e) => {
                log::error!("Search page fallback failed too: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Video search, widened with a playlist-only search when it turns up too few.
    async fn search_with_resolver(&self, keyword: &str, found: &mut PlaylistSet) -> Result<()> {
        let query = SearchQuery {
            kind: SearchKind::Videos,
            terms: format!("{} playlist", keyword),
            limit: self.config.primary_limit,
        };
        let entries = self.resolver.search(&query, true).await?;
        let linked = entries.into_iter().filter_map(|entry| {
            let id = urls::list_id_from_watch_url(entry.url.as_deref()?)?;
            Some(Playlist::new(id, entry.title))
        });
        found.extend(linked);
        log::debug!("Video search linked to {} playlists", found.len());

        if found.len() < self.config.escalation_threshold {
            log::info!(
                "Only {} playlists found, running a playlist-only search",
                found.len()
            );
            let query = SearchQuery {
                kind: SearchKind::Playlists,
                terms: keyword.to_string(),
                limit: self.config.escalation_limit,
            };
            let entries = self.resolver.search(&query, true).await?;
            let added = found.extend(
                entries
                    .into_iter()
                    .filter_map(|entry| Some(Playlist::new(entry.id?, entry.title))),
            );
            log::debug!("Playlist search added {} new playlists", added);
        }

        Ok(())
    }

    async fn search_with_page(&self, keyword: &str) -> Result<Vec<Playlist>> {
        let body = self
            .search_page
            .fetch_playlist_results(&format!("{} playlist", keyword))
            .await?;
        Ok(extract_playlist_ids(&body, self.config.fallback_cap)
            .into_iter()
            .map(|id| Playlist::new(id, None))
            .collect())
    }
}
