use crate::library::{Playlist, Track, TrackId, TrackSource, playlists};

/// Which part of the state a mutation touched.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Tracks,
    Current,
    Playing,
    Source,
    Loading,
    Error,
}

/// Plain data held by the store.
#[derive(Debug, Clone, Default)]
pub struct TrackState {
    pub tracks: Vec<Track>,
    pub current: Option<Track>,
    pub playing: bool,
    pub source: TrackSource,
    pub loading: bool,
    /// Transient, user-visible message from the last failed operation.
    pub error: Option<String>,
}

pub type Observer = Box<dyn FnMut(&TrackState, StoreChange) + Send>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct TrackStateStore {
    state: TrackState,
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl TrackStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TrackState {
        &self.state
    }

    pub fn tracks(&self) -> &[Track] {
        &self.state.tracks
    }

    pub fn current(&self) -> Option<&Track> {
        self.state.current.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    /// Register `observer`; it is called after every mutation.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&TrackState, StoreChange) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    fn notify(&mut self, change: StoreChange) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&self.state, change);
        }
    }

    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.state.tracks = tracks;
        self.notify(StoreChange::Tracks);
    }

    pub fn set_current(&mut self, track: Option<Track>) {
        self.state.current = track;
        self.notify(StoreChange::Current);
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.state.playing = playing;
        self.notify(StoreChange::Playing);
    }

    pub fn set_source(&mut self, source: TrackSource) {
        self.state.source = source;
        self.notify(StoreChange::Source);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.state.loading = loading;
        self.notify(StoreChange::Loading);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state.error = Some(message.into());
        self.notify(StoreChange::Error);
    }

    pub fn clear_error(&mut self) {
        self.state.error = None;
        self.notify(StoreChange::Error);
    }

    /// Replace the track with the same id, in the list and as current.
    /// Returns false (and notifies nobody) when the id is unknown.
    pub fn replace_track(&mut self, track: Track) -> bool {
        let Some(pos) = self.position_of(track.id) else {
            return false;
        };

        let is_current = self.state.current.as_ref().map(|c| c.id) == Some(track.id);
        if is_current {
            self.state.current = Some(track.clone());
        }
        self.state.tracks[pos] = track;
        self.notify(StoreChange::Tracks);
        if is_current {
            self.notify(StoreChange::Current);
        }
        true
    }

    pub fn push_track(&mut self, track: Track) {
        self.state.tracks.push(track);
        self.notify(StoreChange::Tracks);
    }

    /// Drop the track with `id` from the list. The current track is kept so
    /// that playback is not disturbed.
    pub fn remove_track(&mut self, id: TrackId) -> Option<Track> {
        let pos = self.position_of(id)?;
        let removed = self.state.tracks.remove(pos);
        self.notify(StoreChange::Tracks);
        Some(removed)
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.state.tracks.iter().find(|t| t.id == id)
    }

    fn position_of(&self, id: TrackId) -> Option<usize> {
        self.state.tracks.iter().position(|t| t.id == id)
    }

    fn current_index(&self) -> Option<usize> {
        let current = self.state.current.as_ref()?;
        self.position_of(current.id)
    }

    /// Track after the current one, wrapping to the first.
    ///
    /// `None` when the list is empty or the current track is not in it.
    pub fn next(&self) -> Option<Track> {
        let len = self.state.tracks.len();
        let i = self.current_index()?;
        Some(self.state.tracks[(i + 1) % len].clone())
    }

    /// Track before the current one, wrapping to the last.
    pub fn previous(&self) -> Option<Track> {
        let len = self.state.tracks.len();
        let i = self.current_index()?;
        Some(self.state.tracks[(i + len - 1) % len].clone())
    }

    /// Loaded tracks belonging to `source`.
    pub fn tracks_in(&self, source: TrackSource) -> Vec<Track> {
        source.select(self.state.tracks.clone())
    }

    pub fn playlists(&self) -> Vec<Playlist> {
        playlists(&self.state.tracks)
    }
}
