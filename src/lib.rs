//! # grainctl - MIDI control surface for a granular sampler
//!
//! Turns hardware controller input into playback-engine actions.
//!
//! ## Architecture
//!
//! grainctl is an umbrella crate that coordinates:
//! - **grainctl-midi** - Control events, controller table, decoder, swap-buffer channel
//! - **grainctl-midi-io** - Port discovery, per-port driver callbacks, virtual ports
//!
//! and adds the parts that know about the sampler: parameter curves, the
//! dispatch mapper, UI-side playback state and engine feedback.
//!
//! Data flows one way. Driver threads decode raw messages and publish
//! [`ControlEvent`]s; the UI thread drains them once per frame in
//! [`ControlPipeline::update`], which maps them through the curves and hands
//! [`ControlAction`]s to a [`PlaybackEngine`].
//!
//! ## Quick Start
//!
//! ```
//! use grainctl::prelude::*;
//!
//! let config = Config::default();
//! let mut pipeline = ControlPipeline::builder()
//!     .config(config.clone())
//!     .build()?;
//!
//! let mut state = PlaybackState::new(&config);
//! let mut engine = RecordingEngine::new();
//!
//! pipeline.publish(ControlEvent::new(ControlKind::Gain, 1.0));
//! pipeline.update(&mut state, &mut engine);
//! assert_eq!(engine.last(), Some(ControlAction::Gain { multiplier: 4.0 }));
//! # Ok::<(), grainctl::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `midi-hardware` (default) - Hardware MIDI input through midir

pub use grainctl_midi as midi;
pub use grainctl_midi_io as midi_io;

pub use grainctl_midi::{
    ControlEvent, ControlKind, ControllerMap, Decoder, SwapChannel, DEFAULT_CONTROLLER_MAP,
};
pub use grainctl_midi_io::{InputBackend, PortInfo, VirtualBackend};

#[cfg(feature = "midi-hardware")]
pub use grainctl_midi_io::MidirBackend;

mod error;
pub use error::{Error, Result};

mod config;
pub use config::Config;

pub mod curve;

mod selection;
pub use selection::Selection;

mod state;
pub use state::{ChunkPeak, PlaybackState, WaveState};

mod engine;
pub use engine::{ControlAction, PlaybackEngine, RecordingEngine};

mod keyboard;
pub use keyboard::KeyCommand;

mod dispatch;
pub use dispatch::Dispatcher;

mod feedback;
pub use feedback::{CursorTriggerMsg, EngineFeedback, RecordWaveMsg};

mod builder;
mod pipeline;

pub use builder::ControlPipelineBuilder;
pub use pipeline::ControlPipeline;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{
        Config, ControlAction, ControlEvent, ControlKind, ControlPipeline, Error, KeyCommand,
        PlaybackEngine, PlaybackState, RecordingEngine, Result,
    };
}
