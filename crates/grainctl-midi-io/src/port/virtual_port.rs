//! Software MIDI inputs.
//!
//! A [`VirtualBackend`] exposes a fixed set of named ports. Each port has a
//! [`VirtualSender`] that plays the driver's role: `send` invokes the
//! installed callback on the caller's thread, so several senders on several
//! threads behave like several hardware devices.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{InputBackend, InputCallback, InputConnection};
use crate::error::{Error, Result};

struct VirtualSlot {
    index: usize,
    name: String,
    open_error: Option<String>,
    close_error: Option<String>,
    callback: Mutex<Option<InputCallback>>,
    opens: AtomicUsize,
    closes: AtomicUsize,
}

/// In-process input backend.
#[derive(Clone, Default)]
pub struct VirtualBackend {
    slots: Vec<Arc<VirtualSlot>>,
}

impl VirtualBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_port(self, name: impl Into<String>) -> Self {
        self.push_slot(name.into(), None, None)
    }

    /// A port whose `connect` fails with `message`.
    pub fn with_failing_port(self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.push_slot(name.into(), Some(message.into()), None)
    }

    /// A port that opens but reports an error when closed.
    pub fn with_port_failing_close(
        self,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.push_slot(name.into(), None, Some(message.into()))
    }

    fn push_slot(
        mut self,
        name: String,
        open_error: Option<String>,
        close_error: Option<String>,
    ) -> Self {
        let index = self.slots.len();
        self.slots.push(Arc::new(VirtualSlot {
            index,
            name,
            open_error,
            close_error,
            callback: Mutex::new(None),
            opens: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
        }));
        self
    }

    pub fn sender(&self, index: usize) -> Option<VirtualSender> {
        self.slots.get(index).map(|slot| VirtualSender {
            slot: Arc::clone(slot),
        })
    }

    pub fn is_connected(&self, index: usize) -> bool {
        self.slots
            .get(index)
            .map(|slot| slot.callback.lock().is_some())
            .unwrap_or(false)
    }

    pub fn open_count(&self, index: usize) -> usize {
        self.slots
            .get(index)
            .map(|slot| slot.opens.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    pub fn close_count(&self, index: usize) -> usize {
        self.slots
            .get(index)
            .map(|slot| slot.closes.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    fn slot(&self, index: usize) -> Result<&Arc<VirtualSlot>> {
        self.slots
            .get(index)
            .ok_or_else(|| Error::MidiDevice(format!("virtual input {} not found", index)))
    }
}

impl InputBackend for VirtualBackend {
    fn port_count(&self) -> Result<usize> {
        Ok(self.slots.len())
    }

    fn port_name(&self, index: usize) -> Result<String> {
        Ok(self.slot(index)?.name.clone())
    }

    fn connect(
        &self,
        index: usize,
        _port_name: &str,
        callback: InputCallback,
    ) -> Result<Box<dyn InputConnection>> {
        let slot = self.slot(index)?;
        if let Some(message) = &slot.open_error {
            return Err(Error::MidiDevice(message.clone()));
        }

        let mut installed = slot.callback.lock();
        if installed.is_some() {
            return Err(Error::MidiDevice(format!(
                "virtual input {} already connected",
                index
            )));
        }
        *installed = Some(callback);
        slot.opens.fetch_add(1, Ordering::AcqRel);

        Ok(Box::new(VirtualConnection {
            slot: Some(Arc::clone(slot)),
        }))
    }
}

struct VirtualConnection {
    slot: Option<Arc<VirtualSlot>>,
}

impl InputConnection for VirtualConnection {
    fn close(mut self: Box<Self>) -> Result<()> {
        let Some(slot) = self.slot.take() else {
            return Ok(());
        };
        slot.callback.lock().take();
        slot.closes.fetch_add(1, Ordering::AcqRel);

        match &slot.close_error {
            Some(message) => Err(Error::PortClose {
                index: slot.index,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Drop for VirtualConnection {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            slot.callback.lock().take();
        }
    }
}

/// Device side of a virtual port.
#[derive(Clone)]
pub struct VirtualSender {
    slot: Arc<VirtualSlot>,
}

impl VirtualSender {
    pub fn index(&self) -> usize {
        self.slot.index
    }

    pub fn name(&self) -> &str {
        &self.slot.name
    }

    /// Deliver `message` to the connected callback.
    ///
    /// Returns `false` when the port is not connected. Holds the port's
    /// callback lock for the duration of the call, so a concurrent close
    /// waits for an in-flight delivery and no delivery starts after it.
    pub fn send(&self, message: &[u8]) -> bool {
        self.send_at(0, message)
    }

    pub fn send_at(&self, stamp: u64, message: &[u8]) -> bool {
        let mut callback = self.slot.callback.lock();
        match callback.as_mut() {
            Some(callback) => {
                callback(stamp, message);
                true
            }
            None => false,
        }
    }
}
