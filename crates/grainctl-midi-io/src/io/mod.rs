//! Hardware MIDI input via midir.
//!
//! Requires the `midi-io` feature.

mod midir_backend;

pub use midir_backend::MidirBackend;
