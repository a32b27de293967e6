//! Application module: the app model coordinating the track store, the
//! playback controller and gateway results.
//!
//! The `App` lives on the UI thread and is the only writer of the store.

mod events;
mod model;

pub use events::{Action, AppEvent};
pub use model::*;

#[cfg(test)]
mod tests;
