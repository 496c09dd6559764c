use std::collections::HashSet;

use crate::services::youtube::urls;

/// A playlist found by search.
///
/// `video_count` and `video_ids` stay `None` until the playlist has been
/// resolved by the filter stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub title: String,
    pub url: String,
    pub id: String,
    pub video_count: Option<usize>,
    pub video_ids: Option<Vec<String>>,
}

impl Playlist {
    /// Build an unresolved playlist with a canonical URL. A missing or blank
    /// title falls back to a placeholder.
    pub fn new(id: impl Into<String>, title: Option<String>) -> Self {
        let id = id.into();
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| placeholder_title(&id));
        Self {
            url: urls::playlist_url(&id),
            title,
            id,
            video_count: None,
            video_ids: None,
        }
    }

    /// Attach the resolved member listing.
    pub fn with_members(mut self, video_count: usize, video_ids: Vec<String>) -> Self {
        self.video_count = Some(video_count);
        self.video_ids = Some(video_ids);
        self
    }

    pub fn video_ids(&self) -> &[String] {
        self.video_ids.as_deref().unwrap_or_default()
    }
}

pub fn placeholder_title(id: &str) -> String {
    format!("Playlist {}", id)
}

/// Ordered collection of playlists, unique by id. The first playlist seen
/// for an id is kept.
#[derive(Debug, Default)]
pub struct PlaylistSet {
    seen: HashSet<String>,
    playlists: Vec<Playlist>,
}

impl PlaylistSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when a playlist with the same id was already present.
    pub fn insert(&mut self, playlist: Playlist) -> bool {
        if self.seen.contains(&playlist.id) {
            return false;
        }
        self.seen.insert(playlist.id.clone());
        self.playlists.push(playlist);
        true
    }

    /// Insert every playlist, returning how many were new.
    pub fn extend(&mut self, playlists: impl IntoIterator<Item = Playlist>) -> usize {
        let mut added = 0;
        for playlist in playlists {
            if self.insert(playlist) {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn into_vec(self) -> Vec<Playlist> {
        self.playlists
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_synthesizes_url_and_title() {
        let playlist = Playlist::new("PL123", None);
        assert_eq!(playlist.url, "https://www.youtube.com/playlist?list=PL123");
        assert_eq!(playlist.title, "Playlist PL123");
        assert!(playlist.video_count.is_none());
        assert!(playlist.video_ids().is_empty());

        let blank = Playlist::new("PL9", Some("   ".to_string()));
        assert_eq!(blank.title, "Playlist PL9");
    }

    #[test]
    fn test_set_keeps_first_seen() {
        let mut set = PlaylistSet::new();
        assert!(set.insert(Playlist::new("a", Some("first".to_string()))));
        assert!(set.insert(Playlist::new("b", Some("other".to_string()))));
        assert!(!set.insert(Playlist::new("a", Some("second".to_string()))));

        let playlists = set.into_vec();
        assert_eq!(playlists.len(), 2);
        assert_eq!(playlists[0].id, "a");
        assert_eq!(playlists[0].title, "first");
        assert_eq!(playlists[1].id, "b");
    }

    #[test]
    fn test_extend_counts_new_only() {
        let mut set = PlaylistSet::new();
        set.extend(["a", "b", "c"].map(|id| Playlist::new(id, None)));

        let added = set.extend(["b", "d", "d", "e"].map(|id| Playlist::new(id, None)));
        assert_eq!(added, 2);
        assert_eq!(set.len(), 5);

        let ids: Vec<_> = set.into_vec().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    }
}
