//! The ethernet layer.
//!
//! This is tasked with decoding the framed ethernet data that the physical device deals with, and
//! putting upper layer data into an ethernet framing. The state within the ethernet endpoint is
//! tiny: its own hardware address and a table of upper protocol handlers, keyed by ethertype.
//!
//! Incoming frames are handed to the handler registered for their ethertype together with a
//! [`Controller`] through which the handler can put its own frames onto the device. Because the
//! handlers are owned by the endpoint, typed access to one of them goes through [`handler`],
//! [`handler_mut`] or, when the device is needed as well, [`split`].
//!
//! [`Controller`]: struct.Controller.html
//! [`handler`]: struct.Endpoint.html#method.handler
//! [`handler_mut`]: struct.Endpoint.html#method.handler_mut
//! [`split`]: struct.Endpoint.html#method.split
use core::any::Any;

use crate::layer::FnHandler;

mod endpoint;
mod packet;

pub use endpoint::Endpoint;

pub use packet::{
    Controller,
    In as InPacket,
};

/// Upcast to `Any` for typed access to registered handlers.
///
/// Implemented for all `'static` types, there should be no need to implement it manually.
pub trait AsAny {
    /// Borrow as a dynamically typed value.
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as a dynamically typed value.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A ethernet receiver.
///
/// Processes incoming ethernet frames of the ethertype it was registered for and is free to
/// generate additional frames through the controller of the packet.
pub trait Recv: AsAny {
    /// Inspect one incoming, valid ethernet frame.
    fn receive(&mut self, frame: InPacket<'_>);
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<F> Recv for FnHandler<F>
    where F: FnMut(InPacket<'_>) + 'static
{
    fn receive(&mut self, frame: InPacket<'_>) {
        self.0(frame)
    }
}
