//! Platform driver seam.
//!
//! The port manager only talks to an [`InputBackend`]. The midir backend
//! drives real hardware; the virtual backend lets software (and tests) play
//! the role of a device.

use crate::error::Result;

/// Driver callback: `(timestamp_us, message)`.
///
/// Runs on the driver's own thread, one thread per open port.
pub type InputCallback = Box<dyn FnMut(u64, &[u8]) + Send + 'static>;

/// An open driver connection.
pub trait InputConnection {
    /// Stop callback delivery and release the driver connection.
    ///
    /// Once this returns, the callback passed to
    /// [`InputBackend::connect`] is never invoked again.
    fn close(self: Box<Self>) -> Result<()>;
}

/// Enumerates and opens MIDI input endpoints.
pub trait InputBackend {
    fn port_count(&self) -> Result<usize>;

    fn port_name(&self, index: usize) -> Result<String>;

    /// Open endpoint `index` and install `callback`.
    ///
    /// `port_name` is the client-side name the driver shows for the
    /// connection.
    fn connect(
        &self,
        index: usize,
        port_name: &str,
        callback: InputCallback,
    ) -> Result<Box<dyn InputConnection>>;
}
