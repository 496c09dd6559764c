use url::Url;

const YOUTUBE_BASE: &str = "https://www.youtube.com";

/// `sp` filter value that restricts the results page to playlists
pub const PLAYLIST_FILTER: &str = "EgIQAw%3D%3D";

pub fn playlist_url(playlist_id: &str) -> String {
    format!("{}/playlist?list={}", YOUTUBE_BASE, playlist_id)
}

pub fn watch_url(video_id: &str) -> String {
    format!("{}/watch?v={}", YOUTUBE_BASE, video_id)
}

/// Results page for `terms`, filtered to playlists.
pub fn playlist_results_url(terms: &str) -> String {
    format!(
        "{}/results?search_query={}&sp={}",
        YOUTUBE_BASE,
        urlencoding::encode(terms),
        PLAYLIST_FILTER
    )
}

/// Pull the playlist id out of a watch link such as
/// `https://www.youtube.com/watch?v=abc&list=PLxyz&index=2`. Relative links
/// are resolved against the YouTube origin.
pub fn list_id_from_watch_url(link: &str) -> Option<String> {
    if !link.contains("watch?v=") || !link.contains("list=") {
        return None;
    }
    let url = Url::parse(YOUTUBE_BASE).ok()?.join(link).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "list")
        .map(|(_, value)| value.to_string())
        .filter(|id| !id.is_empty())
}
