//! Observable in-memory holder of the loaded track list and the
//! now-playing selection.
//!
//! The store has a single writer (the app model on the UI thread); every
//! setter notifies all observers synchronously after the mutation.

mod model;

pub use model::*;
