//! The control pipeline: ports in, engine actions out.

use std::sync::Arc;

use grainctl_midi::{ControlEvent, SwapChannel};
use grainctl_midi_io::{PortInfo, PortManager};
use tracing::debug;

use crate::builder::ControlPipelineBuilder;
use crate::dispatch::Dispatcher;
use crate::engine::{ControlAction, PlaybackEngine};
use crate::keyboard::KeyCommand;
use crate::state::PlaybackState;

/// Owns the MIDI ports, the event channel and the dispatcher.
///
/// Built with [`ControlPipeline::builder`]. Call [`update`](Self::update)
/// once per frame from the UI thread.
///
/// Dropping the pipeline closes every port before the channel is released,
/// so no driver callback outlives it.
pub struct ControlPipeline {
    // Declared first so the ports drop before the channel.
    ports: PortManager,
    channel: Arc<SwapChannel<ControlEvent>>,
    dispatcher: Dispatcher,
    batch: Vec<ControlEvent>,
    actions: Vec<ControlAction>,
    midi_error: Option<grainctl_midi_io::Error>,
}

impl ControlPipeline {
    pub fn builder() -> ControlPipelineBuilder {
        ControlPipelineBuilder::default()
    }

    pub(crate) fn new(
        ports: PortManager,
        channel: Arc<SwapChannel<ControlEvent>>,
        dispatcher: Dispatcher,
        midi_error: Option<grainctl_midi_io::Error>,
    ) -> Self {
        Self {
            ports,
            channel,
            dispatcher,
            batch: Vec::new(),
            actions: Vec::new(),
            midi_error,
        }
    }

    /// `true` while at least one input port is open.
    pub fn is_midi_enabled(&self) -> bool {
        !self.ports.is_empty()
    }

    /// Why MIDI setup failed, when the pipeline was built with
    /// [`midi_optional`](ControlPipelineBuilder::midi_optional).
    pub fn midi_error(&self) -> Option<&grainctl_midi_io::Error> {
        self.midi_error.as_ref()
    }

    pub fn ports(&self) -> Vec<PortInfo> {
        self.ports.port_info()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Shared handle to the event channel, for software controllers.
    pub fn channel(&self) -> Arc<SwapChannel<ControlEvent>> {
        Arc::clone(&self.channel)
    }

    /// Inject an event as if it came from a port.
    pub fn publish(&self, event: ControlEvent) {
        self.channel.publish(event);
    }

    /// Take everything published since the last poll.
    ///
    /// The returned batch is valid until the next call.
    pub fn poll(&mut self) -> &[ControlEvent] {
        self.channel.drain_into(&mut self.batch);
        &self.batch
    }

    /// Drain pending events, dispatch them and hand the resulting actions to
    /// `engine`. Returns the number of events processed.
    pub fn update<E>(&mut self, state: &mut PlaybackState, engine: &mut E) -> usize
    where
        E: PlaybackEngine + ?Sized,
    {
        self.channel.drain_into(&mut self.batch);
        if self.batch.is_empty() {
            return 0;
        }

        self.actions.clear();
        self.dispatcher
            .dispatch_into(&self.batch, state, &mut self.actions);

        let wave = self.dispatcher.wave();
        for action in self.actions.drain(..) {
            engine.apply(wave, action);
        }
        self.batch.len()
    }

    /// Apply a keyboard command immediately.
    pub fn key<E>(&mut self, command: KeyCommand, state: &mut PlaybackState, engine: &mut E)
    where
        E: PlaybackEngine + ?Sized,
    {
        let wave = self.dispatcher.wave();
        for action in self.dispatcher.apply_key(command, state) {
            engine.apply(wave, action);
        }
    }

    /// Close every port. Events already in the channel can still be drained.
    pub fn shutdown(&mut self) {
        if !self.ports.is_empty() {
            debug!("Closing {} MIDI input(s)", self.ports.len());
        }
        self.ports.close_all();
    }
}

impl Drop for ControlPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for ControlPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlPipeline")
            .field("ports", &self.ports)
            .field("pending", &self.channel.len())
            .field("dispatcher", &self.dispatcher)
            .field("midi_error", &self.midi_error)
            .finish()
    }
}
