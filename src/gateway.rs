//! REST access to the track catalog backend.
//!
//! - `/tracks`: list, search, get, create, update, delete
//! - `/users`: list, add, find, login (find or create)

mod client;
mod tracks;
mod users;

pub use client::ApiClient;
pub use tracks::RemoteTrackGateway;
pub use users::{UserCredentials, UserGateway, UserRecord};
