//! MIDI control types for the grainctl pipeline.
//!
//! Pure, hardware-independent pieces:
//! - **Control events**: typed, normalized performance controls
//! - **Controller table**: compiled-in CC number -> control kind layout
//! - **Decoder**: raw three-byte voice messages -> control events
//! - **Swap channel**: lock-guarded, drain-by-swap buffer shared between
//!   driver callback threads and the update loop
//!
//! # Example
//!
//! ```
//! use grainctl_midi::{decode, ControlKind, SwapChannel};
//!
//! let channel = SwapChannel::new();
//! if let Some(event) = decode([0xB0, 57, 127]) {
//!     channel.publish(event);
//! }
//!
//! let batch = channel.drain();
//! assert_eq!(batch[0].kind(), ControlKind::Gain);
//! assert_eq!(batch[0].value(), 1.0);
//! ```

pub mod channel;
pub mod controller;
pub mod decode;
mod event;

pub use channel::SwapChannel;
pub use controller::{CCNumber, ControllerMap, DEFAULT_CONTROLLER_MAP};
pub use decode::{decode, voice_bytes, Decoder};
pub use event::{ControlEvent, ControlKind};
