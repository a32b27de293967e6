use std::collections::BTreeMap;

use super::model::Track;

/// A named grouping of tracks, derived from each track's `playlist_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub name: String,
    pub tracks: Vec<Track>,
}

/// Group `tracks` by playlist name, sorted by name.
///
/// Tracks without a playlist (or with a blank name) are left out. Inside a
/// playlist the input order is kept.
pub fn playlists(tracks: &[Track]) -> Vec<Playlist> {
    let mut groups: BTreeMap<String, Vec<Track>> = BTreeMap::new();
    for t in tracks {
        if let Some(name) = t
            .playlist_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            groups.entry(name.to_string()).or_default().push(t.clone());
        }
    }

    groups
        .into_iter()
        .map(|(name, tracks)| Playlist { name, tracks })
        .collect()
}

/// Names of all playlists referenced by `tracks`, sorted and deduplicated.
pub fn playlist_names(tracks: &[Track]) -> Vec<String> {
    playlists(tracks).into_iter().map(|p| p.name).collect()
}

/// Copy of `track` moved into playlist `name`. An empty name clears it.
pub fn assign_playlist(track: &Track, name: &str) -> Track {
    let mut t = track.clone();
    let name = name.trim();
    t.playlist_name = if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    };
    t
}
