use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use rand::Rng;

use crate::config::AudioFormat;
use crate::playlist::Playlist;
use crate::ports::resolver::MediaResolver;
use crate::sampler;
use crate::services::youtube::urls;

pub struct AudioDownloader<'a, R: MediaResolver> {
    resolver: &'a R,
    format: &'a AudioFormat,
}

impl<'a, R: MediaResolver> AudioDownloader<'a, R> {
    pub fn new(resolver: &'a R, format: &'a AudioFormat) -> Self {
        Self { resolver, format }
    }

    /// Download `count` random members of `playlist` into `output_dir`.
    ///
    /// Only files that exist on disk after the fetch are returned. Individual
    /// fetch failures are logged and skipped; the only error is failing to
    /// create `output_dir`.
    pub async fn download_random_audio<G: Rng + ?Sized>(
        &self,
        playlist: &Playlist,
        count: usize,
        output_dir: &Path,
        rng: &mut G,
    ) -> Result<Vec<PathBuf>> {
        let video_ids = playlist.video_ids();
        if video_ids.is_empty() {
            log::warn!("No videos available in playlist {}", playlist.title);
            return Ok(Vec::new());
        }

        tokio::fs::create_dir_all(output_dir)
            .await
            .wrap_err_with(|| {
                format!("Failed to create output directory: {}", output_dir.display())
            })?;
        log::info!("Output directory: {}", output_dir.display());

        let selected = sampler::sample(video_ids, count, rng);
        let mut downloaded = Vec::new();

        for (index, video_id) in selected.iter().enumerate() {
            let number = index + 1;
            let video_url = urls::watch_url(video_id);
            log::info!(
                "Downloading audio {}/{} from {}: {}",
                number,
                selected.len(),
                playlist.title,
                video_url
            );

            let base_name = audio_base_name(number, video_id);
            let base = output_dir.join(&base_name);
            if let Err(e) = self.resolver.fetch_audio(&video_url, &base, self.format).await {
                log::error!("Failed to download audio {}: {:#}", video_url, e);
                continue;
            }

            let expected =
                output_dir.join(format!("{}.{}", base_name, self.format.codec.extension()));
            if tokio::fs::try_exists(&expected).await.unwrap_or(false) {
                log::info!("Downloaded {}", expected.display());
                downloaded.push(expected);
            } else {
                log::warn!("File {} was not created", expected.display());
            }
        }

        log::info!(
            "{}/{} audio files downloaded from {}",
            downloaded.len(),
            selected.len(),
            playlist.title
        );
        Ok(downloaded)
    }
}

fn audio_base_name(number: usize, video_id: &str) -> String {
    format!("audio_{}_{}", number, video_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AudioCodec;
    use crate::ports::resolver::MockMediaResolver;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn mp3() -> AudioFormat {
        AudioFormat {
            codec: AudioCodec::Mp3,
            quality: "192K".to_string(),
        }
    }

    fn playlist_with(ids: &[&str]) -> Playlist {
        Playlist::new("PLtest", Some("Test".to_string())).with_members(
            ids.len(),
            ids.iter().map(|id| id.to_string()).collect(),
        )
    }

    /// Writes `<base>.mp3` like yt-dlp would.
    fn write_output(base: &Path) {
        let mut name = base.as_os_str().to_owned();
        name.push(".mp3");
        std::fs::write(PathBuf::from(name), b"ID3").unwrap();
    }

    #[tokio::test]
    async fn test_downloads_and_verifies_files() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("playlist_1_PLtest");
        let mut resolver = MockMediaResolver::new();
        resolver
            .expect_fetch_audio()
            .withf(|url, _, format| {
                url.starts_with("https://www.youtube.com/watch?v=")
                    && format.codec == AudioCodec::Mp3
            })
            .times(2)
            .returning(|_, base, _| {
                write_output(base);
                Ok(())
            });

        let format = mp3();
        let downloader = AudioDownloader::new(&resolver, &format);
        let playlist = playlist_with(&["a", "b", "c", "d", "e"]);
        let files = downloader
            .download_random_audio(&playlist, 2, &output_dir, &mut StdRng::seed_from_u64(5))
            .await
            .unwrap();

        assert_eq!(files.len(), 2);
        for (index, file) in files.iter().enumerate() {
            assert!(file.exists());
            assert_eq!(file.parent().unwrap(), output_dir);
            let name = file.file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with(&format!("audio_{}_", index + 1)));
            assert!(name.ends_with(".mp3"));
        }
    }

    #[tokio::test]
    async fn test_missing_file_and_errors_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut resolver = MockMediaResolver::new();
        resolver
            .expect_fetch_audio()
            .withf(|url, _, _| url.ends_with("v=ok"))
            .returning(|_, base, _| {
                write_output(base);
                Ok(())
            });
        resolver
            .expect_fetch_audio()
            .withf(|url, _, _| url.ends_with("v=silent"))
            .returning(|_, _, _| Ok(()));
        resolver
            .expect_fetch_audio()
            .withf(|url, _, _| url.ends_with("v=broken"))
            .returning(|_, _, _| Err(color_eyre::eyre::eyre!("video unavailable")));

        let format = mp3();
        let downloader = AudioDownloader::new(&resolver, &format);
        let playlist = playlist_with(&["ok", "silent", "broken"]);
        let files = downloader
            .download_random_audio(&playlist, 10, dir.path(), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        let name = files[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with("_ok.mp3"));
        assert!(files[0].exists());
    }

    #[tokio::test]
    async fn test_no_videos_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("never_created");
        let resolver = MockMediaResolver::new();
        let format = mp3();
        let downloader = AudioDownloader::new(&resolver, &format);

        let unresolved = Playlist::new("PL", None);
        let files = downloader
            .download_random_audio(&unresolved, 3, &output_dir, &mut rand::rng())
            .await
            .unwrap();
        assert!(files.is_empty());
        assert!(!output_dir.exists());
    }

    #[tokio::test]
    async fn test_zero_count_downloads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut resolver = MockMediaResolver::new();
        resolver.expect_fetch_audio().never();
        let format = mp3();
        let downloader = AudioDownloader::new(&resolver, &format);

        let files = downloader
            .download_random_audio(&playlist_with(&["a", "b"]), 0, dir.path(), &mut rand::rng())
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_uses_codec_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut resolver = MockMediaResolver::new();
        resolver.expect_fetch_audio().returning(|_, base, _| {
            let mut name = base.as_os_str().to_owned();
            name.push(".ogg");
            std::fs::write(PathBuf::from(name), b"OggS").unwrap();
            Ok(())
        });
        let format = AudioFormat {
            codec: AudioCodec::Vorbis,
            quality: "5".to_string(),
        };
        let downloader = AudioDownloader::new(&resolver, &format);

        let files = downloader
            .download_random_audio(&playlist_with(&["x"]), 1, dir.path(), &mut rand::rng())
            .await
            .unwrap();
        assert_eq!(files, vec![dir.path().join("audio_1_x.ogg")]);
    }
}
