use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::config::Settings;
use crate::error::PlaybackError;
use crate::library::Track;

use super::engine::AudioEngine;
use super::sink::RodioEngine;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackObserver, PlaybackState, PlayerEvent};

/// Owns the audio thread and its single engine handle.
///
/// Commands return as soon as they are queued; outcomes arrive as
/// [`PlayerEvent`]s on the receiver handed out at construction.
pub struct PlaybackController {
    tx: Sender<AudioCmd>,
    state: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl PlaybackController {
    /// Start a controller backed by the default `rodio` output device.
    pub fn new(settings: &Settings) -> (Self, Receiver<PlayerEvent>) {
        let fetch_timeout = Duration::from_secs(settings.server.timeout_secs);
        Self::with_engine(
            move || RodioEngine::open(fetch_timeout),
            Duration::from_millis(settings.playback.poll_interval_ms.max(1)),
        )
    }

    /// Start a controller whose engine is built on the audio thread by `make_engine`.
    pub fn with_engine<E, F>(
        make_engine: F,
        poll_interval: Duration,
    ) -> (Self, Receiver<PlayerEvent>)
    where
        E: AudioEngine + 'static,
        F: FnOnce() -> Result<E, PlaybackError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<PlayerEvent>();
        let state: PlaybackHandle = Arc::new(Mutex::new(PlaybackState::default()));

        let handle = spawn_audio_thread(make_engine, rx, state.clone(), event_tx, poll_interval);

        (
            Self {
                tx,
                state,
                join: Mutex::new(Some(handle)),
            },
            event_rx,
        )
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), PlaybackError> {
        self.tx.send(cmd).map_err(|_| PlaybackError::Disconnected)
    }

    /// Stop whatever plays and start `track` from its `file_path`.
    pub fn play(&self, track: Track) -> Result<(), PlaybackError> {
        debug!(track_id = track.id, "Queue play");
        self.send(AudioCmd::Play {
            track,
            location: None,
        })
    }

    /// Like [`play`](Self::play) but reading audio from `location`
    /// (e.g. a downloaded copy).
    pub fn play_from(
        &self,
        track: Track,
        location: impl Into<String>,
    ) -> Result<(), PlaybackError> {
        self.send(AudioCmd::Play {
            track,
            location: Some(location.into()),
        })
    }

    /// Flip play/pause; no-op when nothing is loaded.
    pub fn toggle_pause(&self) -> Result<(), PlaybackError> {
        self.send(AudioCmd::TogglePause)
    }

    /// Seek to `position_ms`, clamped to the track length; no-op when nothing is loaded.
    pub fn seek(&self, position_ms: i64) -> Result<(), PlaybackError> {
        self.send(AudioCmd::Seek(position_ms))
    }

    /// Seek relative to the current position.
    pub fn seek_by(&self, delta_secs: i64) -> Result<(), PlaybackError> {
        self.send(AudioCmd::SeekBy(delta_secs))
    }

    pub fn stop(&self) -> Result<(), PlaybackError> {
        self.send(AudioCmd::Stop)
    }

    pub fn state(&self) -> PlaybackState {
        self.observer().snapshot()
    }

    pub fn position(&self) -> Duration {
        self.state().position
    }

    /// A read-only handle on the playback state for other components.
    pub fn observer(&self) -> PlaybackObserver {
        PlaybackObserver::new(self.state.clone())
    }

    /// Stop playback and join the audio thread. Safe to call more than once.
    pub fn shutdown(&self) {
        let _ = self.send(AudioCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
