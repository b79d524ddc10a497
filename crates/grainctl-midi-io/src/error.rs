//! Error types for the MIDI input subsystem.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Zero hardware inputs at setup. Fatal to MIDI, not to the process.
    #[error("no MIDI input found")]
    NoDevicesFound,

    #[error("failed to open MIDI input {index}: {message}")]
    PortOpenFailed { index: usize, message: String },

    /// Only ever logged; teardown never propagates it.
    #[error("failed to close MIDI input {index}: {message}")]
    PortClose { index: usize, message: String },

    #[error("MIDI device error: {0}")]
    MidiDevice(String),
}

#[cfg(feature = "midi-io")]
impl From<midir::InitError> for Error {
    fn from(e: midir::InitError) -> Self {
        Error::MidiDevice(e.to_string())
    }
}

#[cfg(feature = "midi-io")]
impl From<midir::ConnectError<midir::MidiInput>> for Error {
    fn from(e: midir::ConnectError<midir::MidiInput>) -> Self {
        Error::MidiDevice(e.to_string())
    }
}

#[cfg(feature = "midi-io")]
impl From<midir::PortInfoError> for Error {
    fn from(e: midir::PortInfoError) -> Self {
        Error::MidiDevice(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
