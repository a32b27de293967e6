use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::error::PlaybackError;
use crate::library::Track;

use super::engine::{AudioEngine, Voice};
use super::types::{AudioCmd, PlaybackHandle, PlaybackState, PlayerEvent};

struct Loaded<V> {
    track: Track,
    voice: V,
    duration: Option<Duration>,
    paused: bool,
}

fn publish(state: &PlaybackHandle, f: impl FnOnce(&mut PlaybackState)) {
    match state.lock() {
        Ok(mut s) => f(&mut s),
        Err(poisoned) => f(&mut poisoned.into_inner()),
    }
}

fn emit(events: &Sender<PlayerEvent>, event: PlayerEvent) {
    // The receiver going away only means nobody listens anymore.
    let _ = events.send(event);
}

fn fail(events: &Sender<PlayerEvent>, track: Option<Track>, err: &PlaybackError) {
    warn!(
        track_id = track.as_ref().map(|t| t.id),
        error = %err,
        "Playback command failed"
    );
    emit(
        events,
        PlayerEvent::Failed {
            track,
            reason: err.to_string(),
        },
    );
}

/// Clamp `ms` to `[0, duration]`; without a known duration only the lower bound applies.
pub(super) fn clamp_position(ms: i64, duration: Option<Duration>) -> Duration {
    let pos = Duration::from_millis(ms.max(0) as u64);
    match duration {
        Some(d) => pos.min(d),
        None => pos,
    }
}

fn location_for(track: &Track, location: Option<String>) -> Result<String, PlaybackError> {
    location
        .or_else(|| track.file_path.clone())
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .ok_or_else(|| {
            PlaybackError::InvalidSource(format!("track {} has no file path", track.id))
        })
}

pub(super) fn spawn_audio_thread<E, F>(
    make_engine: F,
    rx: Receiver<AudioCmd>,
    state: PlaybackHandle,
    events: Sender<PlayerEvent>,
    poll_interval: Duration,
) -> JoinHandle<()>
where
    E: AudioEngine + 'static,
    F: FnOnce() -> Result<E, PlaybackError> + Send + 'static,
{
    thread::spawn(move || {
        let mut engine = match make_engine() {
            Ok(e) => Some(e),
            Err(e) => {
                // Keep serving commands so every play reports the failure.
                error!(error = %e, "Audio engine unavailable");
                None
            }
        };

        let mut loaded: Option<Loaded<E::Voice>> = None;

        loop {
            match rx.recv_timeout(poll_interval) {
                Ok(cmd) => match cmd {
                    AudioCmd::Play { track, location } => {
                        let location = match location_for(&track, location) {
                            Ok(l) => l,
                            Err(e) => {
                                fail(&events, Some(track), &e);
                                continue;
                            }
                        };
                        let Some(engine) = engine.as_mut() else {
                            let e = PlaybackError::NoOutputDevice("engine failed to start".into());
                            fail(&events, Some(track), &e);
                            continue;
                        };

                        // Load first: a bad source must not interrupt what is playing.
                        let voice = match engine.load(&location) {
                            Ok(v) => v,
                            Err(e) => {
                                fail(&events, Some(track), &e);
                                continue;
                            }
                        };

                        if let Some(old) = loaded.take() {
                            old.voice.stop();
                        }

                        let duration = if track.duration > 0 {
                            Some(Duration::from_secs(track.duration as u64))
                        } else {
                            voice.total_duration()
                        };
                        voice.play();
                        debug!(track_id = track.id, location = %location, "Playback started");

                        publish(&state, |s| {
                            s.track = Some(track.clone());
                            s.playing = true;
                            s.loaded = true;
                            s.position = Duration::ZERO;
                            s.duration = duration;
                        });
                        loaded = Some(Loaded {
                            track: track.clone(),
                            voice,
                            duration,
                            paused: false,
                        });
                        emit(&events, PlayerEvent::Ready(track));
                    }

                    AudioCmd::TogglePause => {
                        let Some(cur) = loaded.as_mut() else {
                            continue;
                        };
                        if cur.paused {
                            cur.voice.play();
                        } else {
                            cur.voice.pause();
                        }
                        cur.paused = !cur.paused;
                        let playing = !cur.paused;
                        let position = cur.voice.position();
                        publish(&state, |s| {
                            s.playing = playing;
                            s.position = position;
                        });
                    }

                    AudioCmd::Seek(ms) => {
                        if let Some(cur) = loaded.as_ref() {
                            seek_to(cur, ms, &state, &events);
                        }
                    }

                    AudioCmd::SeekBy(secs) => {
                        if let Some(cur) = loaded.as_ref() {
                            let cur_ms = i64::try_from(cur.voice.position().as_millis())
                                .unwrap_or(i64::MAX);
                            let target = cur_ms.saturating_add(secs.saturating_mul(1000));
                            seek_to(cur, target, &state, &events);
                        }
                    }

                    AudioCmd::Stop => {
                        if let Some(old) = loaded.take() {
                            old.voice.stop();
                        }
                        publish(&state, |s| *s = PlaybackState::default());
                    }

                    AudioCmd::Quit => {
                        if let Some(old) = loaded.take() {
                            old.voice.stop();
                        }
                        // Update shared state so observers don't keep showing Playing.
                        publish(&state, |s| {
                            s.playing = false;
                            s.loaded = false;
                        });
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // periodic position refresh + end-of-track check
                    let finished = match loaded.as_ref() {
                        Some(cur) if !cur.paused => {
                            let position = cur.voice.position();
                            publish(&state, |s| s.position = position);
                            cur.voice.is_finished()
                        }
                        _ => false,
                    };

                    if finished {
                        if let Some(done) = loaded.take() {
                            let end = done.duration;
                            publish(&state, |s| {
                                s.playing = false;
                                s.loaded = false;
                                if let Some(d) = end {
                                    s.position = d;
                                }
                            });
                            debug!(track_id = done.track.id, "Playback finished");
                            emit(&events, PlayerEvent::Finished(done.track));
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

fn seek_to<V: Voice>(
    cur: &Loaded<V>,
    ms: i64,
    state: &PlaybackHandle,
    events: &Sender<PlayerEvent>,
) {
    let target = clamp_position(ms, cur.duration);
    match cur.voice.seek(target) {
        Ok(()) => publish(state, |s| s.position = target),
        Err(e) => fail(events, Some(cur.track.clone()), &e),
    }
}
