//! Stateful processing of the eth and arp layers.
//!
//! ## Layering
//!
//! Decoding and encoding of headers lives in `wire`. This module holds what a layer remembers
//! between packets, kept in an endpoint per layer. Between two calls into the interface the
//! endpoints may be inspected and changed freely, much like `ip neigh` changes the kernel table.
//!
//! ## Receiving
//!
//! The ethernet layer routes each incoming frame to the handler registered for its ethertype. A
//! handler gets to see the frame together with a [`Controller`] through which it can put its own
//! frames onto the device. Everything happens within the call, there is no queueing of work.
//!
//! ## Sending
//!
//! Sending goes top down. The arp layer decides on the destination hardware address (or that it
//! must ask for it first) and the ethernet layer pads and frames the payload before handing it to
//! the device.
//!
//! [`Controller`]: eth/struct.Controller.html
use core::fmt;

pub mod arp;
pub mod eth;

/// The result type of layer operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Why an operation of the eth or arp layer failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// The request makes no sense in the current state.
    ///
    /// For example, resolving through an interface whose arp handler was unregistered, or acting
    /// on a packet that failed to decode.
    Illegal,

    /// The payload exceeds the 1500 octets an ethernet frame can carry.
    BadSize,

    /// The destination can not be resolved to a single neighbor.
    ///
    /// Multicast and `0.0.0.0/8` addresses.
    Unreachable,

    /// The device did not accept another frame.
    ///
    /// Retrying later, when the device has drained its queue, may succeed.
    Exhausted,
}

/// Adapts a closure into a protocol handler.
///
/// See the `Recv` implementation in the [`eth`](eth/index.html) module.
pub struct FnHandler<F>(pub F);

/// Any decoding failure makes the attempted operation illegal.
impl From<crate::wire::Error> for Error {
    fn from(_: crate::wire::Error) -> Self {
        Error::Illegal
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Illegal => f.write_str("operation not possible in this state"),
            Error::BadSize => f.write_str("payload does not fit an ethernet frame"),
            Error::Unreachable => f.write_str("destination has no single hardware address"),
            Error::Exhausted => f.write_str("device queue is full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
