use std::path::PathBuf;

use serde::Deserialize;

use crate::library::TrackSource;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/trackdeck/config.toml` or
/// `~/.config/trackdeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TRACKDECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL of the catalog backend, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// Whole-request timeout (seconds).
    pub timeout_secs: u64,
    /// TCP connect timeout (seconds).
    pub connect_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Play the next track in the list when the current one ends.
    pub auto_advance: bool,
    /// Number of seconds to scrub when pressing `h` / `l`.
    pub seek_step_secs: u64,
    /// How often the audio thread refreshes position and checks for the end
    /// of a track (milliseconds).
    pub poll_interval_ms: u64,
    /// List loaded at startup.
    pub start_source: TrackSource,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            auto_advance: true,
            seek_step_secs: 5,
            poll_interval_ms: 200,
            start_source: TrackSource::Home,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Where downloaded tracks are stored. `None` uses the XDG data dir.
    pub downloads_dir: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks when indexing downloads.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            downloads_dir: None,
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    pub filter: String,
    /// Log file. `None` writes `trackdeck.log` in the data dir, since the
    /// terminal is in raw mode while the player runs.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "warn,trackdeck=info".to_string(),
            file: None,
        }
    }
}
