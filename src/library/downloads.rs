use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::TrackId;

/// Local directory holding downloaded audio files named `<track id>.<ext>`.
#[derive(Debug, Clone)]
pub struct Downloads {
    dir: PathBuf,
    extensions: Vec<String>,
    follow_links: bool,
    include_hidden: bool,
}

fn normalize_ext(e: &str) -> String {
    e.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

impl Downloads {
    pub fn new(dir: impl Into<PathBuf>, settings: &LibrarySettings) -> Self {
        Self {
            dir: dir.into(),
            extensions: settings
                .extensions
                .iter()
                .map(|e| normalize_ext(e))
                .filter(|e| !e.is_empty())
                .collect(),
            follow_links: settings.follow_links,
            include_hidden: settings.include_hidden,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| self.supports(ext))
            .unwrap_or(false)
    }

    /// Map every downloaded track id to its file.
    ///
    /// Files whose stem is not a track id are ignored. A missing directory
    /// yields an empty index.
    pub fn index(&self) -> HashMap<TrackId, PathBuf> {
        let mut found = HashMap::new();
        if !self.dir.is_dir() {
            return found;
        }

        let include_hidden = self.include_hidden;
        for entry in WalkDir::new(&self.dir)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !path.is_file() || !self.is_audio_file(path) {
                continue;
            }
            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.trim().parse::<TrackId>().ok());
            match id {
                Some(id) => {
                    found.insert(id, path.to_path_buf());
                }
                None => debug!(path = %path.display(), "Skipping file without track id"),
            }
        }

        found
    }

    /// Path of the downloaded copy of `id`, if there is one.
    pub fn local_path(&self, id: TrackId) -> Option<PathBuf> {
        self.index().remove(&id)
    }

    /// Whether files with extension `ext` are picked up by [`index`](Self::index).
    pub fn supports(&self, ext: &str) -> bool {
        let ext = normalize_ext(ext);
        self.extensions.iter().any(|e| e == &ext)
    }

    /// Store `bytes` as the downloaded copy of `id`, replacing any earlier copy.
    ///
    /// Extensions outside the configured set are refused with `InvalidInput`,
    /// since such a file would never be found again.
    pub fn save(&self, id: TrackId, ext: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let ext = match normalize_ext(ext) {
            e if e.is_empty() => "mp3".to_string(),
            e => e,
        };
        if !self.supports(&ext) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsupported audio format .{ext}"),
            ));
        }
        fs::create_dir_all(&self.dir)?;
        self.remove(id)?;

        let path = self.dir.join(format!("{id}.{ext}"));
        fs::write(&path, bytes)?;
        debug!(id, path = %path.display(), size = bytes.len(), "Saved download");
        Ok(path)
    }

    /// Delete the downloaded copy of `id`. Returns whether a file was removed.
    pub fn remove(&self, id: TrackId) -> io::Result<bool> {
        match self.local_path(id) {
            Some(path) => {
                fs::remove_file(&path)?;
                debug!(id, path = %path.display(), "Removed download");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Extension to use for a downloaded copy of `location`, taken from its last
/// path segment and defaulting to `mp3`.
pub fn extension_for(location: &str) -> String {
    let without_query = location.split(['?', '#']).next().unwrap_or(location);
    let last = without_query.rsplit('/').next().unwrap_or(without_query);
    match Path::new(last).extension().and_then(|e| e.to_str()) {
        Some(e) if !e.is_empty() => normalize_ext(e),
        _ => {
            warn!(location, "No extension in audio location, defaulting to mp3");
            "mp3".to_string()
        }
    }
}
