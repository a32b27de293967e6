//! Messages flowing into and out of the app model.

use std::path::PathBuf;

use crate::audio::PlayerEvent;
use crate::error::GatewayError;
use crate::library::{Track, TrackId, TrackSource};

/// Work the app model asks the runtime to carry out.
///
/// Gateway actions run on the background executor and come back as an
/// [`AppEvent`]; player actions go straight to the playback controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Fetch the catalog and keep the part belonging to the source.
    Fetch(TrackSource),
    /// Title search, filtered like the source it was started from.
    Search { query: String, source: TrackSource },
    Create(Track),
    /// `PUT` the full track.
    Update(Track),
    Delete(TrackId),
    /// Fetch the audio into the downloads directory, then `PUT` the track
    /// (already flagged as downloaded).
    Download(Track),
    /// Delete the local copy, then `PUT` the track (flag already cleared).
    RemoveDownload(Track),
    Play {
        track: Track,
        /// Local copy to read instead of `file_path`.
        location: Option<PathBuf>,
    },
    TogglePause,
    Seek(i64),
    SeekBy(i64),
    Stop,
}

/// Results delivered back to the UI thread.
#[derive(Debug)]
pub enum AppEvent {
    TracksLoaded {
        source: TrackSource,
        result: Result<Vec<Track>, GatewayError>,
    },
    SearchResults {
        source: TrackSource,
        result: Result<Vec<Track>, GatewayError>,
    },
    TrackCreated(Result<Track, GatewayError>),
    /// The server accepted the edit; carries the track as sent.
    TrackUpdated(Result<Track, GatewayError>),
    TrackDeleted {
        id: TrackId,
        result: Result<(), GatewayError>,
    },
    /// A local download step failed before reaching the server.
    DownloadFailed { id: TrackId, reason: String },
    Player(PlayerEvent),
}
