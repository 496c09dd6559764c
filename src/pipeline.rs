use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use rand::Rng;

use crate::config::{AudioFormat, SearchConfig};
use crate::ports::resolver::MediaResolver;
use crate::ports::search_page::SearchPage;
use crate::sampler;
use crate::services::downloader::AudioDownloader;
use crate::services::filter::filter_playlists;
use crate::services::finder::PlaylistFinder;

/// Settings for one run, fixed once the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub keyword: String,
    pub num_playlists: usize,
    pub num_audio: usize,
    pub min_videos: usize,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub found: usize,
    pub qualified: usize,
    pub selected: usize,
    pub requested: usize,
    pub files: Vec<PathBuf>,
}

/// How a run ended. Only a completed run with at least one file is a success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    NoPlaylistsFound,
    NoneQualified,
    NoneSelected,
    Completed(RunSummary),
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Completed(summary) if !summary.files.is_empty() => 0,
            _ => 1,
        }
    }
}

pub struct Pipeline<'a, R: MediaResolver, P: SearchPage> {
    resolver: &'a R,
    search_page: &'a P,
    search: &'a SearchConfig,
    format: &'a AudioFormat,
}

impl<'a, R: MediaResolver, P: SearchPage> Pipeline<'a, R, P> {
    pub fn new(
        resolver: &'a R,
        search_page: &'a P,
        search: &'a SearchConfig,
        format: &'a AudioFormat,
    ) -> Self {
        Self {
            resolver,
            search_page,
            search,
            format,
        }
    }

    /// Search, filter, sample and download, one stage after the other.
    pub async fn run<G: Rng + ?Sized>(&self, run: &RunConfig, rng: &mut G) -> Result<RunOutcome> {
        tokio::fs::create_dir_all(&run.output_dir)
            .await
            .wrap_err_with(|| {
                format!("Failed to create output directory: {}", run.output_dir.display())
            })?;
        println!("Output directory: {}", run.output_dir.display());

        println!("\n=== SEARCHING PLAYLISTS ===");
        let finder = PlaylistFinder::new(self.resolver, self.search_page, self.search);
        let playlists = finder.find_playlists(&run.keyword).await;
        if playlists.is_empty() {
            println!("No playlists found for keyword '{}'.", run.keyword);
            return Ok(RunOutcome::NoPlaylistsFound);
        }
        let found = playlists.len();
        println!("Found {} playlists.", found);

        println!("\n=== FILTERING PLAYLISTS ===");
        let qualified = filter_playlists(self.resolver, playlists, run.min_videos).await;
        if qualified.is_empty() {
            println!("No playlist has at least {} videos.", run.min_videos);
            return Ok(RunOutcome::NoneQualified);
        }
        println!("Qualified playlists: {}/{}", qualified.len(), found);

        println!("\n=== SELECTING PLAYLISTS ===");
        let selected = sampler::sample(&qualified, run.num_playlists, rng);
        if selected.is_empty() {
            println!("No playlists selected.");
            return Ok(RunOutcome::NoneSelected);
        }
        for (rank, playlist) in selected.iter().enumerate() {
            println!(
                "Playlist {} selected: {} ({} videos)",
                rank + 1,
                playlist.title,
                playlist.video_count.unwrap_or_default()
            );
        }

        println!("\n=== DOWNLOADING AUDIO ===");
        let downloader = AudioDownloader::new(self.resolver, self.format);
        let mut files = Vec::new();
        for (index, playlist) in selected.iter().enumerate() {
            let rank = index + 1;
            println!("\nPlaylist {}/{}: {}", rank, selected.len(), playlist.title);
            let playlist_dir = run
                .output_dir
                .join(format!("playlist_{}_{}", rank, playlist.id));
            match downloader
                .download_random_audio(playlist, run.num_audio, &playlist_dir, rng)
                .await
            {
                Ok(downloaded) => files.extend(downloaded),
                Err(e) => log::error!("Skipping playlist {}: {:#}", playlist.id, e),
            }
        }

        Ok(RunOutcome::Completed(RunSummary {
            found,
            qualified: qualified.len(),
            selected: selected.len(),
            requested: run.num_playlists.saturating_mul(run.num_audio),
            files,
        }))
    }
}

pub fn print_summary(summary: &RunSummary, output_dir: &Path) {
    println!("\n=== SUMMARY ===");
    println!("Playlists found: {}", summary.found);
    println!("Playlists qualified: {}", summary.qualified);
    println!("Playlists selected: {}", summary.selected);
    println!(
        "Audio files downloaded: {}/{}",
        summary.files.len(),
        summary.requested
    );

    if summary.files.is_empty() {
        println!(
            "No audio files were downloaded. Check your connection or try another keyword."
        );
        return;
    }

    println!("\nDownloaded audio files:");
    for (index, file) in summary.files.iter().enumerate() {
        println!("{}. {}", index + 1, file.display());
    }
    println!("\nAll files were saved under: {}", output_dir.display());
}
