//! Playback control.
//!
//! A [`PlaybackController`] owns a dedicated audio thread holding the single
//! engine handle. Commands are queued over a channel; the thread publishes
//! [`PlaybackState`] and reports [`PlayerEvent`]s back to the caller.

mod engine;
mod player;
mod sink;
mod source;
mod thread;
mod types;

pub use engine::{AudioEngine, Voice};
pub use player::PlaybackController;
pub use sink::{RodioEngine, RodioVoice};
pub use source::{SourceData, open_source};
pub use types::{PlaybackObserver, PlaybackState, PlayerEvent};
