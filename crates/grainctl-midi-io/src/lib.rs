//! MIDI input subsystem for grainctl.
//!
//! Discovers input endpoints, opens each one with its own driver callback and
//! feeds decoded control events into a shared [`SwapChannel`].
//!
//! Feature gates: `midi-io` (hardware input through midir, on by default).
//! The virtual backend is always available.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use grainctl_midi::{Decoder, SwapChannel};
//! use grainctl_midi_io::{MidirBackend, PortManager};
//!
//! let channel = Arc::new(SwapChannel::new());
//! let ports = PortManager::open_all_available_ports(
//!     &MidirBackend::default(),
//!     "grainctl input",
//!     Decoder::default(),
//!     &channel,
//! )?;
//!
//! // once per update tick
//! for event in channel.drain() {
//!     println!("{:?}", event);
//! }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod backend;
pub use backend::{InputBackend, InputCallback, InputConnection};

pub(crate) mod port;
pub use port::{
    list_devices, PortContext, PortHandle, PortInfo, PortManager, VirtualBackend, VirtualSender,
};

#[cfg(feature = "midi-io")]
pub(crate) mod io;

#[cfg(feature = "midi-io")]
pub use io::MidirBackend;

pub use grainctl_midi::{ControlEvent, ControlKind, Decoder, SwapChannel};
