//! Builder for configuring and constructing a [`ControlPipeline`].

use std::sync::Arc;

use grainctl_midi::{ControlEvent, ControllerMap, Decoder, SwapChannel};
use grainctl_midi_io::{InputBackend, PortManager};
use tracing::{error, info};

use crate::dispatch::Dispatcher;
use crate::pipeline::ControlPipeline;
use crate::{Config, Result};

/// MIDI requires explicit opt-in via `.midi()` (hardware, through midir) or
/// `.backend(..)` (any [`InputBackend`]). Without it the pipeline runs
/// headless and only sees published events and keyboard commands.
///
/// By default a MIDI setup failure fails the build. With
/// [`midi_optional`](Self::midi_optional) it is logged and the pipeline comes
/// up without MIDI.
///
/// # Example
///
/// ```ignore
/// use grainctl::prelude::*;
///
/// let mut pipeline = ControlPipeline::builder()
///     .config(Config::default())
///     .midi()
///     .midi_optional()
///     .build()?;
///
/// let mut state = PlaybackState::new(&Config::default());
/// let mut engine = RecordingEngine::new();
///
/// // once per frame
/// pipeline.update(&mut state, &mut engine);
/// ```
#[derive(Default)]
pub struct ControlPipelineBuilder {
    config: Config,
    enable_midi: bool,
    midi_optional: bool,
    backend: Option<Box<dyn InputBackend>>,
    controller_map: ControllerMap,
}

impl ControlPipelineBuilder {
    /// Default: [`Config::default`]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Open every hardware MIDI input.
    pub fn midi(mut self) -> Self {
        self.enable_midi = true;
        self
    }

    /// Use `backend` instead of hardware. Enables MIDI.
    pub fn backend(mut self, backend: impl InputBackend + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self.enable_midi = true;
        self
    }

    /// Default: [`DEFAULT_CONTROLLER_MAP`](grainctl_midi::DEFAULT_CONTROLLER_MAP)
    pub fn controller_map(mut self, map: ControllerMap) -> Self {
        self.controller_map = map;
        self
    }

    /// Keep going without MIDI if no device is present or a port fails to open.
    pub fn midi_optional(mut self) -> Self {
        self.midi_optional = true;
        self
    }

    pub fn build(self) -> Result<ControlPipeline> {
        self.config.validate()?;

        let channel = Arc::new(SwapChannel::new());
        let dispatcher = Dispatcher::new(&self.config);

        if !self.enable_midi {
            return Ok(ControlPipeline::new(
                PortManager::disabled(),
                channel,
                dispatcher,
                None,
            ));
        }

        let decoder = Decoder::new(self.controller_map);
        match open_ports(&self.config, self.backend, decoder, &channel) {
            Ok(ports) => {
                info!("MIDI control enabled on {} input(s)", ports.len());
                Ok(ControlPipeline::new(ports, channel, dispatcher, None))
            }
            Err(e) if self.midi_optional => {
                error!("MIDI setup failed, continuing without MIDI: {}", e);
                Ok(ControlPipeline::new(
                    PortManager::disabled(),
                    channel,
                    dispatcher,
                    Some(e),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn open_ports(
    config: &Config,
    backend: Option<Box<dyn InputBackend>>,
    decoder: Decoder,
    channel: &Arc<SwapChannel<ControlEvent>>,
) -> grainctl_midi_io::Result<PortManager> {
    let backend = match backend {
        Some(backend) => backend,
        None => hardware_backend(config)?,
    };
    PortManager::open_all_available_ports(
        backend.as_ref(),
        &config.midi_client_name,
        decoder,
        channel,
    )
}

#[cfg(feature = "midi-hardware")]
fn hardware_backend(config: &Config) -> grainctl_midi_io::Result<Box<dyn InputBackend>> {
    Ok(Box::new(grainctl_midi_io::MidirBackend::new(
        config.midi_client_name.clone(),
    )))
}

#[cfg(not(feature = "midi-hardware"))]
fn hardware_backend(_config: &Config) -> grainctl_midi_io::Result<Box<dyn InputBackend>> {
    Err(grainctl_midi_io::Error::MidiDevice(
        "hardware MIDI support not enabled".to_string(),
    ))
}
