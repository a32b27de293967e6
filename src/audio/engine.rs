//! Seam between the audio thread and the sound backend.

use std::time::Duration;

use crate::error::PlaybackError;

/// Something that can turn an audio location into a playable voice.
///
/// Engines live on the audio thread; they need not be `Send`.
pub trait AudioEngine {
    type Voice: Voice;

    /// Open and decode `location` (file path or http(s) URL), returning a
    /// paused voice positioned at the start.
    fn load(&mut self, location: &str) -> Result<Self::Voice, PlaybackError>;
}

/// One loaded track.
pub trait Voice {
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    /// True once all audio has been consumed.
    fn is_finished(&self) -> bool;
    fn position(&self) -> Duration;
    /// Length reported by the decoder, if it knows it.
    fn total_duration(&self) -> Option<Duration>;
    fn seek(&self, to: Duration) -> Result<(), PlaybackError>;
}
