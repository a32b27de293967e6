//! trackdeck: a small music player client for a REST track catalog.
//!
//! - [`gateway`]: CRUD calls against `/tracks` and `/users`
//! - [`store`]: observable holder of the loaded list and the now-playing track
//! - [`audio`]: playback controller running a single engine on its own thread
//! - [`app`]: the model tying the three together on the UI thread
//! - [`library`]: track model, list sources, playlists and downloads

pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod gateway;
pub mod library;
pub mod store;

pub use app::{Action, App, AppEvent};
pub use audio::{PlaybackController, PlaybackState, PlayerEvent};
pub use error::{GatewayError, PlaybackError};
pub use gateway::{ApiClient, RemoteTrackGateway, UserGateway};
pub use library::{Track, TrackId, TrackSource};
pub use store::TrackStateStore;
