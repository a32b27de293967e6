//! Track model and local bookkeeping: list sources, playlists and the
//! downloads directory.

mod downloads;
mod model;
mod playlists;
mod source;

pub use downloads::{Downloads, extension_for};
pub(crate) use model::is_http_url;
pub use model::{Track, TrackId};
pub use playlists::{Playlist, assign_playlist, playlist_names, playlists};
pub use source::TrackSource;
