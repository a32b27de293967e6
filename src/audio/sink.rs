//! `rodio` implementation of the audio engine.
//!
//! Each load decodes the location into a fresh paused `Sink` attached to the
//! default output stream.

use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::error::PlaybackError;

use super::engine::{AudioEngine, Voice};
use super::source::open_source;

pub struct RodioEngine {
    stream: OutputStream,
    http: reqwest::blocking::Client,
}

impl RodioEngine {
    /// Open the default output device. `fetch_timeout` bounds remote fetches.
    pub fn open(fetch_timeout: Duration) -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::NoOutputDevice(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped; keep the terminal clean.
        stream.log_on_drop(false);

        let http = reqwest::blocking::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| PlaybackError::Fetch(e.to_string()))?;

        Ok(Self { stream, http })
    }
}

impl AudioEngine for RodioEngine {
    type Voice = RodioVoice;

    fn load(&mut self, location: &str) -> Result<RodioVoice, PlaybackError> {
        let data = open_source(location, &self.http)?;
        let source = Decoder::new(data).map_err(|e| PlaybackError::Decode(e.to_string()))?;
        let total = source.total_duration();

        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        sink.append(source);
        Ok(RodioVoice { sink, total })
    }
}

pub struct RodioVoice {
    sink: Sink,
    total: Option<Duration>,
}

impl Voice for RodioVoice {
    fn play(&self) {
        self.sink.play();
    }

    fn pause(&self) {
        self.sink.pause();
    }

    fn stop(&self) {
        self.sink.stop();
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.total
    }

    fn seek(&self, to: Duration) -> Result<(), PlaybackError> {
        self.sink
            .try_seek(to)
            .map_err(|e| PlaybackError::Seek(e.to_string()))
    }
}
