use std::fmt;

use serde::Deserialize;

use super::model::Track;

/// Which filtered view of the catalog is loaded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackSource {
    /// Every track in the catalog.
    #[default]
    Home,
    Favorites,
    Downloads,
}

impl TrackSource {
    /// Parse a source name; anything unknown falls back to `Home`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "favorites" | "favourites" => Self::Favorites,
            "downloads" => Self::Downloads,
            _ => Self::Home,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Favorites => "favorites",
            Self::Downloads => "downloads",
        }
    }

    /// Whether `track` belongs to this view.
    pub fn accepts(&self, track: &Track) -> bool {
        match self {
            Self::Home => true,
            Self::Favorites => track.favorite,
            Self::Downloads => track.downloaded,
        }
    }

    /// Keep only the tracks belonging to this view, preserving order.
    pub fn select(&self, tracks: Vec<Track>) -> Vec<Track> {
        tracks.into_iter().filter(|t| self.accepts(t)).collect()
    }
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
