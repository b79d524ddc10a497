//! Input port discovery and ownership.

mod manager;
mod virtual_port;

pub use manager::{list_devices, PortContext, PortHandle, PortInfo, PortManager};
pub use virtual_port::{VirtualBackend, VirtualSender};
