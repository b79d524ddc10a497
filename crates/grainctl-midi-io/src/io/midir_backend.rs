//! [`InputBackend`] over midir.

use midir::{Ignore, MidiInput, MidiInputConnection};
use tracing::debug;

use crate::backend::{InputBackend, InputCallback, InputConnection};
use crate::error::{Error, Result};

pub const DEFAULT_CLIENT_NAME: &str = "grainctl input";

/// Hardware inputs through the platform MIDI API (CoreMIDI, ALSA, WinMM...).
///
/// midir consumes its `MidiInput` on connect, so each operation creates a
/// fresh client.
#[derive(Debug, Clone)]
pub struct MidirBackend {
    client_name: String,
}

impl MidirBackend {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
        }
    }

    fn client(&self) -> Result<MidiInput> {
        Ok(MidiInput::new(&self.client_name)?)
    }
}

impl Default for MidirBackend {
    fn default() -> Self {
        Self::new(DEFAULT_CLIENT_NAME)
    }
}

impl InputBackend for MidirBackend {
    fn port_count(&self) -> Result<usize> {
        Ok(self.client()?.port_count())
    }

    fn port_name(&self, index: usize) -> Result<String> {
        let input = self.client()?;
        let ports = input.ports();
        let port = ports
            .get(index)
            .ok_or_else(|| Error::MidiDevice(format!("MIDI input {} not found", index)))?;
        Ok(input.port_name(port)?)
    }

    fn connect(
        &self,
        index: usize,
        port_name: &str,
        mut callback: InputCallback,
    ) -> Result<Box<dyn InputConnection>> {
        let mut input = self.client()?;
        // sysex, clock and active sensing never reach the decoder
        input.ignore(Ignore::All);

        let ports = input.ports();
        let port = ports
            .get(index)
            .ok_or_else(|| Error::MidiDevice(format!("MIDI input {} not found", index)))?;

        let connection = input.connect(
            port,
            port_name,
            move |stamp, message, _| callback(stamp, message),
            (),
        )?;
        debug!("midir connection open on input {}", index);

        Ok(Box::new(MidirConnection { connection }))
    }
}

struct MidirConnection {
    connection: MidiInputConnection<()>,
}

impl InputConnection for MidirConnection {
    fn close(self: Box<Self>) -> Result<()> {
        // midir's close is infallible
        let _ = self.connection.close();
        Ok(())
    }
}
