use std::path::{Path, PathBuf};
use std::process::Stdio;

use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;
use tokio::process::Command;

use crate::config::AudioFormat;
use crate::ports::resolver::{MediaResolver, ResolverEntry, SearchKind, SearchQuery};
use crate::services::youtube::urls;

#[derive(Debug, thiserror::Error)]
pub enum YtDlpError {
    #[error("yt-dlp not found at `{0}`. Please install yt-dlp: https://github.com/yt-dlp/yt-dlp#installation")]
    BinaryNotFound(String),
    #[error("Failed to start yt-dlp: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("yt-dlp exited with {status}:\n{stderr}")]
    Failed { status: String, stderr: String },
    #[error("yt-dlp returned invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("yt-dlp listing has no entries")]
    MissingEntries,
}

/// `--dump-single-json` output; only the entries matter here. A single video
/// has no `entries` key at all.
#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    entries: Option<Vec<Option<ResolverEntry>>>,
}

impl Listing {
    fn into_members(self) -> Result<Vec<Option<ResolverEntry>>, YtDlpError> {
        self.entries.ok_or(YtDlpError::MissingEntries)
    }
}

/// Resolver backed by the `yt-dlp` executable.
pub struct YtDlpResolver {
    binary: PathBuf,
}

impl YtDlpResolver {
    /// Locate yt-dlp, preferring an explicitly configured path over `PATH`.
    pub fn new(binary: Option<PathBuf>) -> Result<Self, YtDlpError> {
        let requested = binary.unwrap_or_else(|| PathBuf::from("yt-dlp"));
        let binary = which::which(&requested)
            .map_err(|_| YtDlpError::BinaryNotFound(requested.display().to_string()))?;

        if which::which("ffmpeg").is_err() {
            log::warn!("ffmpeg not found in PATH; yt-dlp will not be able to transcode audio");
        }

        log::debug!("Using yt-dlp at {}", binary.display());
        Ok(Self { binary })
    }

    async fn run(&self, args: &[String]) -> Result<Vec<u8>, YtDlpError> {
        log::debug!("Running {} {:?}", self.binary.display(), args);
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            return Err(YtDlpError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    async fn listing(&self, args: &[String]) -> Result<Listing, YtDlpError> {
        let stdout = self.run(args).await?;
        Ok(serde_json::from_slice(&stdout)?)
    }
}

fn listing_args(target: String, flat: bool, playlist_end: Option<usize>) -> Vec<String> {
    let mut args = vec![
        "--dump-single-json".to_string(),
        "--skip-download".to_string(),
        "--no-warnings".to_string(),
    ];
    if flat {
        args.push("--flat-playlist".to_string());
    }
    if let Some(end) = playlist_end {
        args.push("--playlist-end".to_string());
        args.push(end.to_string());
    }
    args.push(target);
    args
}

fn search_args(query: &SearchQuery, flat: bool) -> Vec<String> {
    match query.kind {
        SearchKind::Videos => listing_args(
            format!("ytsearch{}:{}", query.limit, query.terms),
            flat,
            None,
        ),
        SearchKind::Playlists => listing_args(
            urls::playlist_results_url(&query.terms),
            flat,
            Some(query.limit),
        ),
    }
}

fn fetch_audio_args(video_url: &str, output_base: &Path, format: &AudioFormat) -> Vec<String> {
    vec![
        "--format".to_string(),
        "bestaudio/best".to_string(),
        "--extract-audio".to_string(),
        "--audio-format".to_string(),
        format.codec.as_str().to_string(),
        "--audio-quality".to_string(),
        format.quality.clone(),
        "--no-playlist".to_string(),
        "--no-progress".to_string(),
        "--no-warnings".to_string(),
        "--output".to_string(),
        format!("{}.%(ext)s", output_base.display()),
        video_url.to_string(),
    ]
}

#[async_trait::async_trait]
impl MediaResolver for YtDlpResolver {
    async fn search(&self, query: &SearchQuery, flat: bool) -> Result<Vec<ResolverEntry>> {
        let listing = self
            .listing(&search_args(query, flat))
            .await
            .wrap_err_with(|| format!("Search failed for '{}'", query.terms))?;
        Ok(listing.entries.into_iter().flatten().flatten().collect())
    }

    async fn resolve_playlist_members(
        &self,
        playlist_url: &str,
        flat: bool,
    ) -> Result<Vec<Option<ResolverEntry>>> {
        self.listing(&listing_args(playlist_url.to_string(), flat, None))
            .await
            .and_then(Listing::into_members)
            .wrap_err_with(|| format!("Failed to list playlist {}", playlist_url))
    }

    async fn fetch_audio(
        &self,
        video_url: &str,
        output_base: &Path,
        format: &AudioFormat,
    ) -> Result<()> {
        self.run(&fetch_audio_args(video_url, output_base, format))
            .await
            .wrap_err_with(|| format!("Failed to fetch audio from {}", video_url))?;
        Ok(())
    }
}
