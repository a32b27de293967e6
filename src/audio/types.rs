//! Audio-related small types and handles.
//!
//! This module defines the commands sent to the audio thread, the events it
//! reports back and the shared playback state it publishes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::Track;

#[derive(Debug)]
pub(crate) enum AudioCmd {
    /// Load and start `track`, reading from `location` when given instead of
    /// the track's own `file_path`.
    Play {
        track: Track,
        location: Option<String>,
    },
    /// Toggle pause/resume.
    TogglePause,
    /// Seek to an absolute position in milliseconds (clamped).
    Seek(i64),
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i64),
    /// Stop and unload the current track.
    Stop,
    /// Stop playback and exit the audio thread.
    Quit,
}

/// Notifications from the audio thread, delivered in command order.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Playback of the track has begun.
    Ready(Track),
    /// The track played to its natural end.
    Finished(Track),
    /// The command could not be carried out; playback state is unchanged.
    Failed {
        track: Option<Track>,
        reason: String,
    },
}

/// Playback information published by the audio thread.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    /// Loaded (or last finished) track.
    pub track: Option<Track>,
    /// Whether audio is currently running.
    pub playing: bool,
    /// Whether a track is loaded (playing or paused) and can be toggled.
    pub loaded: bool,
    /// Position inside the current track.
    pub position: Duration,
    /// Length of the current track, when known.
    pub duration: Option<Duration>,
}

pub(crate) type PlaybackHandle = Arc<Mutex<PlaybackState>>;

/// Read-only view of the controller's playback state.
#[derive(Debug, Clone)]
pub struct PlaybackObserver {
    inner: PlaybackHandle,
}

impl PlaybackObserver {
    pub(crate) fn new(inner: PlaybackHandle) -> Self {
        Self { inner }
    }

    /// Current playback state; a poisoned lock yields the last written value.
    pub fn snapshot(&self) -> PlaybackState {
        match self.inner.lock() {
            Ok(s) => s.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
