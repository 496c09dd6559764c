use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::{OptionExt, WrapErr};
use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    yt_dlp_path: Option<String>,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub download: DownloadConfig,
}

/// Limits and thresholds used while looking for playlists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of results requested from the generic video search
    pub primary_limit: usize,
    /// Number of results requested from the playlist-only search
    pub escalation_limit: usize,
    /// The playlist-only search runs when fewer playlists than this were found
    pub escalation_threshold: usize,
    /// Maximum number of ids taken from the raw search page
    pub fallback_cap: usize,
    pub user_agent: String,
    /// Request timeout for the raw search page, e.g. "10s"
    pub http_timeout: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            primary_limit: 50,
            escalation_limit: 20,
            escalation_threshold: 10,
            fallback_cap: 20,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_timeout: "10s".to_string(),
        }
    }
}

impl SearchConfig {
    pub fn http_timeout(&self) -> Result<Duration> {
        humantime::parse_duration(&self.http_timeout)
            .wrap_err_with(|| format!("Invalid search.http_timeout: {}", self.http_timeout))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub codec: AudioCodec,
    pub quality: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            codec: AudioCodec::Mp3,
            quality: "192K".to_string(),
        }
    }
}

impl DownloadConfig {
    pub fn audio_format(&self) -> AudioFormat {
        AudioFormat {
            codec: self.codec,
            quality: self.quality.clone(),
        }
    }
}

/// Target codec for the audio transcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    Mp3,
    M4a,
    Opus,
    Flac,
    Wav,
    Vorbis,
    Aac,
}

impl AudioCodec {
    /// Name understood by `yt-dlp --audio-format`
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCodec::Mp3 => "mp3",
            AudioCodec::M4a => "m4a",
            AudioCodec::Opus => "opus",
            AudioCodec::Flac => "flac",
            AudioCodec::Wav => "wav",
            AudioCodec::Vorbis => "vorbis",
            AudioCodec::Aac => "aac",
        }
    }

    /// File extension of the transcoded file
    pub fn extension(&self) -> &'static str {
        match self {
            AudioCodec::Vorbis => "ogg",
            other => other.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFormat {
    pub codec: AudioCodec,
    pub quality: String,
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("playlist-sampler").join("config.toml"))
    }

    /// Load config with default fallback
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the default config to the default path. Existing files are left alone.
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path().ok_or_eyre("Could not determine config directory")?;
        if path.exists() {
            log::info!("Config file already exists at {}", path.display());
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let contents =
            toml::to_string_pretty(&Self::default()).wrap_err("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(path)
    }

    /// Expand ~ to home directory
    fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        PathBuf::from(path)
    }

    /// Get expanded yt-dlp path, if one was configured
    pub fn yt_dlp_path(&self) -> Option<PathBuf> {
        self.yt_dlp_path.as_deref().map(Self::expand_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.search.primary_limit, 50);
        assert_eq!(config.search.escalation_limit, 20);
        assert_eq!(config.search.escalation_threshold, 10);
        assert_eq!(config.search.fallback_cap, 20);
        assert_eq!(config.download.codec, AudioCodec::Mp3);
        assert_eq!(config.download.quality, "192K");
        assert!(config.yt_dlp_path().is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "yt_dlp_path = \"/opt/bin/yt-dlp\"\n\n[search]\nescalation_threshold = 3\n\n[download]\ncodec = \"vorbis\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.search.escalation_threshold, 3);
        assert_eq!(config.search.primary_limit, 50);
        assert_eq!(config.download.codec, AudioCodec::Vorbis);
        assert_eq!(config.download.quality, "192K");
        assert_eq!(config.yt_dlp_path(), Some(PathBuf::from("/opt/bin/yt-dlp")));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[download]\ncodec = \"wma\"\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_http_timeout() {
        let mut search = SearchConfig::default();
        assert_eq!(search.http_timeout().unwrap(), Duration::from_secs(10));
        search.http_timeout = "soon".to_string();
        assert!(search.http_timeout().is_err());
    }

    #[test]
    fn test_codec_extension() {
        assert_eq!(AudioCodec::Mp3.extension(), "mp3");
        assert_eq!(AudioCodec::Vorbis.as_str(), "vorbis");
        assert_eq!(AudioCodec::Vorbis.extension(), "ogg");
    }

    #[test]
    fn test_expand_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(Config::expand_path("~/bin/yt-dlp"), home.join("bin/yt-dlp"));
        }
        assert_eq!(Config::expand_path("/usr/bin/yt-dlp"), PathBuf::from("/usr/bin/yt-dlp"));
    }
}
