//! Encapsulates a network interface card.
//!
//! The stack only needs three things from a device: a way to put a finished frame on the link, a
//! way to take the next received frame off it and the current time. Physical drivers live outside
//! of this crate; [`External`] is a software device whose frames come from and go to memory.
//!
//! [`External`]: external/struct.External.html
pub mod external;

use alloc::vec::Vec;

use crate::layer::Result;
use crate::time::Instant;

pub use self::external::External;

/// A layer 2 device.
pub trait Device {
    /// Transmit one complete ethernet frame.
    ///
    /// The frame is either queued as a whole or not at all. Devices without room for another
    /// frame return `Err(Error::Exhausted)`.
    fn send(&mut self, frame: &[u8]) -> Result<()>;

    /// Dequeue the next received frame, if any.
    fn receive(&mut self) -> Option<Vec<u8>>;

    /// The reference time stamp for the current operation.
    ///
    /// Should be monotonically increasing. Violating this is not a memory safety concern but
    /// entries of the caches may live longer or shorter than configured.
    fn timestamp(&self) -> Instant;
}

impl<D: Device + ?Sized> Device for &'_ mut D {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        (**self).send(frame)
    }

    fn receive(&mut self) -> Option<Vec<u8>> {
        (**self).receive()
    }

    fn timestamp(&self) -> Instant {
        (**self).timestamp()
    }
}
