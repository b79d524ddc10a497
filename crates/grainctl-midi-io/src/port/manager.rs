//! Port Manager
//!
//! Opens every available input endpoint and installs one callback per port.
//! The callback context carries the port index and a non-owning reference to
//! the event channel; the channel's owner must close all ports before letting
//! the channel go.

use std::sync::{Arc, Weak};

use grainctl_midi::{ControlEvent, Decoder, SwapChannel};
use tracing::{debug, trace, warn};

use crate::backend::{InputBackend, InputConnection};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub index: usize,
    pub name: String,
}

/// State handed to a driver callback.
///
/// The only shared, non-owned state that crosses into the driver thread.
pub struct PortContext {
    index: usize,
    decoder: Decoder,
    channel: Weak<SwapChannel<ControlEvent>>,
}

impl PortContext {
    pub fn new(index: usize, decoder: Decoder, channel: Weak<SwapChannel<ControlEvent>>) -> Self {
        Self {
            index,
            decoder,
            channel,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Decode and publish one inbound message.
    ///
    /// Returns `true` if an event was published.
    pub fn handle_message(&self, stamp: u64, message: &[u8]) -> bool {
        let Some(event) = self.decoder.decode_message(message) else {
            trace!(
                "input {}: dropped {:02X?} at {}",
                self.index,
                message,
                stamp
            );
            return false;
        };

        match self.channel.upgrade() {
            Some(channel) => {
                channel.publish(event);
                true
            }
            None => {
                trace!("input {}: channel gone, dropping {:?}", self.index, event);
                false
            }
        }
    }
}

/// One open hardware input connection.
///
/// Exclusively owns its driver connection and closes it exactly once, either
/// through [`close`](Self::close) or on drop.
pub struct PortHandle {
    index: usize,
    name: String,
    connection: Option<Box<dyn InputConnection>>,
}

impl PortHandle {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    pub fn info(&self) -> PortInfo {
        PortInfo {
            index: self.index,
            name: self.name.clone(),
        }
    }

    /// Close failures are logged, never returned.
    pub fn close(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };
        match connection.close() {
            Ok(()) => debug!("Closed MIDI input {}: {}", self.index, self.name),
            Err(e) => warn!("Error closing MIDI input {} ({}): {}", self.index, self.name, e),
        }
    }
}

impl Drop for PortHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for PortHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortHandle")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Owns every open input port.
#[derive(Debug, Default)]
pub struct PortManager {
    handles: Vec<PortHandle>,
}

impl PortManager {
    /// A manager with no ports, for running with MIDI disabled.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Open every input the backend reports.
    ///
    /// Fails with [`Error::NoDevicesFound`] when there are none. The first
    /// port that fails to open aborts setup with [`Error::PortOpenFailed`];
    /// ports opened before it are closed on the way out.
    pub fn open_all_available_ports<B>(
        backend: &B,
        port_name: &str,
        decoder: Decoder,
        channel: &Arc<SwapChannel<ControlEvent>>,
    ) -> Result<Self>
    where
        B: InputBackend + ?Sized,
    {
        let count = backend.port_count()?;
        if count == 0 {
            return Err(Error::NoDevicesFound);
        }

        let mut handles = Vec::with_capacity(count);
        for index in 0..count {
            let name = backend
                .port_name(index)
                .unwrap_or_else(|_| format!("Unknown Device {}", index));

            let context = PortContext::new(index, decoder, Arc::downgrade(channel));
            let connection = backend
                .connect(
                    index,
                    port_name,
                    Box::new(move |stamp, message| {
                        context.handle_message(stamp, message);
                    }),
                )
                .map_err(|e| Error::PortOpenFailed {
                    index,
                    message: e.to_string(),
                })?;

            debug!("Opened MIDI input {}: {}", index, name);
            handles.push(PortHandle {
                index,
                name,
                connection: Some(connection),
            });
        }

        Ok(Self { handles })
    }

    pub fn ports(&self) -> &[PortHandle] {
        &self.handles
    }

    pub fn port_info(&self) -> Vec<PortInfo> {
        self.handles.iter().map(PortHandle::info).collect()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Close every port exactly once. Idempotent.
    pub fn close_all(&mut self) {
        for mut handle in self.handles.drain(..) {
            handle.close();
        }
    }
}

impl Drop for PortManager {
    fn drop(&mut self) {
        self.close_all();
    }
}

/// Enumerate available inputs without opening them.
pub fn list_devices<B>(backend: &B) -> Result<Vec<PortInfo>>
where
    B: InputBackend + ?Sized,
{
    let count = backend.port_count()?;
    Ok((0..count)
        .map(|index| PortInfo {
            index,
            name: backend
                .port_name(index)
                .unwrap_or_else(|_| format!("Unknown Device {}", index)),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::VirtualBackend;
    use grainctl_midi::ControlKind;

    fn channel() -> Arc<SwapChannel<ControlEvent>> {
        Arc::new(SwapChannel::new())
    }

    #[test]
    fn test_no_devices() {
        let backend = VirtualBackend::new();
        let result =
            PortManager::open_all_available_ports(&backend, "test", Decoder::default(), &channel());
        assert_eq!(result.unwrap_err(), Error::NoDevicesFound);
    }

    #[test]
    fn test_opens_every_port() {
        let backend = VirtualBackend::new().with_port("A").with_port("B");
        let manager =
            PortManager::open_all_available_ports(&backend, "test", Decoder::default(), &channel())
                .unwrap();
        assert_eq!(manager.len(), 2);
        assert_eq!(
            manager.port_info(),
            vec![
                PortInfo {
                    index: 0,
                    name: "A".to_string()
                },
                PortInfo {
                    index: 1,
                    name: "B".to_string()
                },
            ]
        );
        assert!(manager.ports().iter().all(PortHandle::is_open));
    }

    #[test]
    fn test_open_failure_aborts_and_closes_opened() {
        let backend = VirtualBackend::new()
            .with_port("A")
            .with_failing_port("B", "busy")
            .with_port("C");
        let err =
            PortManager::open_all_available_ports(&backend, "test", Decoder::default(), &channel())
                .unwrap_err();

        assert_eq!(
            err,
            Error::PortOpenFailed {
                index: 1,
                message: "MIDI device error: busy".to_string()
            }
        );
        assert_eq!(backend.close_count(0), 1);
        assert!(!backend.is_connected(0));
        // setup stops at the failing port
        assert_eq!(backend.open_count(2), 0);
    }

    #[test]
    fn test_close_all_is_idempotent() {
        let backend = VirtualBackend::new().with_port("A");
        let mut manager =
            PortManager::open_all_available_ports(&backend, "test", Decoder::default(), &channel())
                .unwrap();
        manager.close_all();
        manager.close_all();
        drop(manager);
        assert_eq!(backend.close_count(0), 1);
    }

    #[test]
    fn test_close_failure_is_swallowed() {
        let backend = VirtualBackend::new().with_port_failing_close("A", "gone");
        let manager =
            PortManager::open_all_available_ports(&backend, "test", Decoder::default(), &channel())
                .unwrap();
        drop(manager);
        assert_eq!(backend.close_count(0), 1);
    }

    #[test]
    fn test_context_publishes_decoded_events() {
        let channel = channel();
        let context = PortContext::new(3, Decoder::default(), Arc::downgrade(&channel));
        assert_eq!(context.index(), 3);

        assert!(context.handle_message(0, &[0xB0, 52, 127]));
        assert!(!context.handle_message(0, &[0xE0, 0, 64]));
        assert!(!context.handle_message(0, &[0xB0, 52]));

        let batch = channel.drain();
        assert_eq!(batch, vec![ControlEvent::trigger(ControlKind::Record)]);
    }

    #[test]
    fn test_context_outliving_channel_drops_events() {
        let channel = channel();
        let context = PortContext::new(0, Decoder::default(), Arc::downgrade(&channel));
        drop(channel);
        assert!(!context.handle_message(0, &[0x90, 60, 100]));
    }

    #[test]
    fn test_list_devices() {
        let backend = VirtualBackend::new().with_port("Keys");
        let devices = list_devices(&backend).unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name, "Keys");
        assert!(list_devices(&VirtualBackend::new()).unwrap().is_empty());
    }
}
