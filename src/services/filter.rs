use color_eyre::eyre::Result;

use crate::playlist::Playlist;
use crate::ports::resolver::MediaResolver;

/// Resolve each playlist's members and keep those with at least
/// `min_videos` entries. Playlists that fail to resolve are dropped.
pub async fn filter_playlists<R: MediaResolver>(
    resolver: &R,
    playlists: Vec<Playlist>,
    min_videos: usize,
) -> Vec<Playlist> {
    log::info!("Filtering playlists (minimum {} videos)", min_videos);
    let total = playlists.len();
    let mut qualified = Vec::new();

    for playlist in playlists {
        match resolve_members(resolver, &playlist).await {
            Ok((count, ids)) if count >= min_videos => {
                log::info!("Qualified: {} ({} videos)", playlist.title, count);
                qualified.push(playlist.with_members(count, ids));
            }
            Ok((count, _)) => {
                log::debug!(
                    "Skipping {}: {} videos is below the minimum",
                    playlist.title,
                    count
                );
            }
            Err(e) => {
                log::error!("Failed to resolve playlist {}: {:#}", playlist.url, e);
            }
        }
    }

    log::info!("{}/{} playlists qualified", qualified.len(), total);
    qualified
}

/// Member count plus the ids of members that have one.
async fn resolve_members<R: MediaResolver>(
    resolver: &R,
    playlist: &Playlist,
) -> Result<(usize, Vec<String>)> {
    let entries = resolver.resolve_playlist_members(&playlist.url, true).await?;
    let count = entries.len();
    let ids = entries
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.id)
        .collect();
    Ok((count, ids))
}
