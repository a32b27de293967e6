//! The `App` model: user intents in, store mutations and [`Action`]s out.

use tracing::{debug, info, warn};

use crate::audio::{PlaybackState, PlayerEvent};
use crate::library::{Downloads, Track, TrackId, TrackSource, assign_playlist};
use crate::store::TrackStateStore;

use super::events::{Action, AppEvent};

pub struct App {
    pub store: TrackStateStore,
    downloads: Option<Downloads>,
    /// Play the next track when one finishes.
    pub auto_advance: bool,
    /// Seconds moved by one scrub step.
    pub seek_step_secs: u64,
    /// A search answer is awaited; a later load supersedes it.
    search_pending: bool,
}

impl App {
    pub fn new(store: TrackStateStore) -> Self {
        Self {
            store,
            downloads: None,
            auto_advance: true,
            seek_step_secs: 5,
            search_pending: false,
        }
    }

    /// Attach the local downloads directory.
    pub fn with_downloads(mut self, downloads: Downloads) -> Self {
        self.downloads = Some(downloads);
        self
    }

    pub fn downloads(&self) -> Option<&Downloads> {
        self.downloads.as_ref()
    }

    fn start_request(&mut self) {
        self.store.clear_error();
        self.store.set_loading(true);
    }

    /// Reload the list for `source`.
    pub fn load(&mut self, source: TrackSource) -> Vec<Action> {
        self.start_request();
        self.search_pending = false;
        if self.store.state().source != source {
            self.store.set_source(source);
        }
        vec![Action::Fetch(source)]
    }

    /// Reload the currently shown source.
    pub fn reload(&mut self) -> Vec<Action> {
        let source = self.store.state().source;
        self.load(source)
    }

    /// Search by title; a blank query reloads the current source.
    pub fn search(&mut self, query: &str) -> Vec<Action> {
        let query = query.trim();
        if query.is_empty() {
            return self.reload();
        }
        self.start_request();
        self.search_pending = true;
        vec![Action::Search {
            query: query.to_string(),
            source: self.store.state().source,
        }]
    }

    /// Start `track`, preferring its downloaded copy.
    ///
    /// The store's current track only changes once playback actually starts.
    pub fn play(&mut self, track: Track) -> Vec<Action> {
        let location = if track.downloaded {
            self.downloads.as_ref().and_then(|d| d.local_path(track.id))
        } else {
            None
        };
        debug!(
            track_id = track.id,
            local = location.is_some(),
            "Play requested"
        );
        vec![Action::Play { track, location }]
    }

    pub fn play_id(&mut self, id: TrackId) -> Vec<Action> {
        match self.store.track(id).cloned() {
            Some(t) => self.play(t),
            None => Vec::new(),
        }
    }

    pub fn play_next(&mut self) -> Vec<Action> {
        match self.store.next() {
            Some(t) => self.play(t),
            None => Vec::new(),
        }
    }

    pub fn play_previous(&mut self) -> Vec<Action> {
        match self.store.previous() {
            Some(t) => self.play(t),
            None => Vec::new(),
        }
    }

    /// Play the current track, or the first one when nothing was chosen yet.
    pub fn play_or_toggle(&mut self, playback: &PlaybackState) -> Vec<Action> {
        if playback.loaded {
            return vec![Action::TogglePause];
        }
        let target = self
            .store
            .current()
            .cloned()
            .or_else(|| self.store.tracks().first().cloned());
        match target {
            Some(t) => self.play(t),
            None => Vec::new(),
        }
    }

    pub fn toggle_pause(&mut self) -> Vec<Action> {
        vec![Action::TogglePause]
    }

    pub fn seek(&mut self, position_ms: i64) -> Vec<Action> {
        vec![Action::Seek(position_ms)]
    }

    pub fn seek_forward(&mut self) -> Vec<Action> {
        vec![Action::SeekBy(self.seek_step())]
    }

    pub fn seek_backward(&mut self) -> Vec<Action> {
        vec![Action::SeekBy(-self.seek_step())]
    }

    fn seek_step(&self) -> i64 {
        i64::try_from(self.seek_step_secs).unwrap_or(i64::MAX)
    }

    pub fn stop(&mut self) -> Vec<Action> {
        vec![Action::Stop]
    }

    /// Flip the favorite flag on the server; the store follows on success.
    pub fn toggle_favorite(&mut self, id: TrackId) -> Vec<Action> {
        match self.store.track(id) {
            Some(t) => vec![Action::Update(t.with_favorite_toggled())],
            None => Vec::new(),
        }
    }

    /// Download or forget the local copy of a track.
    pub fn toggle_download(&mut self, id: TrackId) -> Vec<Action> {
        let Some(track) = self.store.track(id) else {
            return Vec::new();
        };
        let updated = track.with_downloaded_toggled();
        if updated.downloaded {
            if self.downloads.is_none() {
                self.store.set_error("No downloads directory configured");
                return Vec::new();
            }
            vec![Action::Download(updated)]
        } else {
            vec![Action::RemoveDownload(updated)]
        }
    }

    /// Move a track into playlist `name` (blank clears it).
    pub fn assign_playlist(&mut self, id: TrackId, name: &str) -> Vec<Action> {
        match self.store.track(id) {
            Some(t) => vec![Action::Update(assign_playlist(t, name))],
            None => Vec::new(),
        }
    }

    pub fn add_track(&mut self, track: Track) -> Vec<Action> {
        self.start_request();
        vec![Action::Create(track)]
    }

    pub fn delete_track(&mut self, id: TrackId) -> Vec<Action> {
        self.store.clear_error();
        vec![Action::Delete(id)]
    }

    /// Mirror the controller's play/pause flag into the store.
    pub fn sync_playback(&mut self, playback: &PlaybackState) {
        if self.store.is_playing() != playback.playing {
            self.store.set_playing(playback.playing);
        }
    }

    /// Take the pending user-visible message, clearing it.
    pub fn take_error(&mut self) -> Option<String> {
        let msg = self.store.state().error.clone()?;
        self.store.clear_error();
        Some(msg)
    }

    /// Apply a background result or player notification.
    pub fn handle(&mut self, event: AppEvent) -> Vec<Action> {
        match event {
            AppEvent::TracksLoaded { source, result } => {
                self.store.set_loading(false);
                match result {
                    Ok(tracks) => {
                        // A late answer for a source the user already left is dropped.
                        if source == self.store.state().source {
                            let tracks = source.select(tracks);
                            info!(source = %source, count = tracks.len(), "Tracks loaded");
                            self.store.set_tracks(tracks);
                        }
                    }
                    Err(e) => self.report(format!("Failed to load tracks: {e}")),
                }
                Vec::new()
            }

            AppEvent::SearchResults { source, result } => {
                // Superseded by a load or a source switch.
                if !self.search_pending || source != self.store.state().source {
                    debug!(source = %source, "Dropping stale search results");
                    return Vec::new();
                }
                self.search_pending = false;
                self.store.set_loading(false);
                match result {
                    Ok(tracks) => self.store.set_tracks(source.select(tracks)),
                    Err(e) => self.report(format!("Search failed: {e}")),
                }
                Vec::new()
            }

            AppEvent::TrackCreated(result) => {
                self.store.set_loading(false);
                match result {
                    Ok(track) => {
                        if self.store.state().source.accepts(&track) {
                            self.store.push_track(track);
                        }
                    }
                    Err(e) => self.report(format!("Failed to add track: {e}")),
                }
                Vec::new()
            }

            AppEvent::TrackUpdated(result) => {
                match result {
                    Ok(track) => {
                        if self.store.state().source.accepts(&track) {
                            self.store.replace_track(track);
                        } else {
                            self.store.remove_track(track.id);
                        }
                    }
                    Err(e) => self.report(format!("Failed to update track: {e}")),
                }
                Vec::new()
            }

            AppEvent::TrackDeleted { id, result } => {
                match result {
                    Ok(()) => {
                        self.store.remove_track(id);
                    }
                    Err(e) => self.report(format!("Failed to delete track: {e}")),
                }
                Vec::new()
            }

            AppEvent::DownloadFailed { id, reason } => {
                self.report(format!("Download of track {id} failed: {reason}"));
                Vec::new()
            }

            AppEvent::Player(ev) => self.handle_player(ev),
        }
    }

    fn handle_player(&mut self, event: PlayerEvent) -> Vec<Action> {
        match event {
            PlayerEvent::Ready(track) => {
                self.store.set_current(Some(track));
                self.store.set_playing(true);
                Vec::new()
            }
            PlayerEvent::Finished(track) => {
                debug!(track_id = track.id, "Track finished");
                self.store.set_playing(false);
                if self.auto_advance {
                    self.play_next()
                } else {
                    Vec::new()
                }
            }
            PlayerEvent::Failed { reason, .. } => {
                self.report(reason);
                Vec::new()
            }
        }
    }

    fn report(&mut self, message: String) {
        warn!(message = %message, "Operation failed");
        self.store.set_error(message);
    }
}
