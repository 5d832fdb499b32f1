//! Address resolution and ethernet framing for a minimal user-space network stack.
//!
//! ## Table of contents
//!
//! 1. [Design](#design-and-relevant-core-concepts)
//! 2. [The wire module](wire/index.html)
//! 3. [The layers](layer/index.html)
//!    1. [The eth layer](layer/eth/index.html)
//!    1. [The arp layer](layer/arp/index.html)
//! 4. [Network interfaces](nic/index.html)
//! 5. [The interface context](iface/index.html)
//!
//! ## Design and relevant core concepts
//!
//! One [`Interface`] owns everything that carries state: the network device, the ethernet endpoint
//! with its table of protocol handlers and, registered in that table, the arp endpoint holding the
//! neighbor cache and the buffer of packets waiting for resolution. There are no globals; several
//! interfaces can coexist, for example to connect two of them in a test.
//!
//! Processing is strictly poll driven. Each received frame is handled to completion, including all
//! frames it causes to be sent, before the next one is taken from the device. Time never advances
//! on its own: every expiry decision compares against the timestamp reported by the device, which
//! makes the whole state machine deterministic under test.
//!
//! [`Interface`]: iface/struct.Interface.html
#![warn(missing_docs)]
#![warn(unreachable_pub)]

// tests should be able to use `std`
#![cfg_attr(all(
    not(feature = "std"),
    not(test)),
no_std)]

#[macro_use] mod macros;

pub mod iface;
pub mod layer;
pub mod nic;
pub mod time;
pub mod wire;

/// The `alloc` crate, backing the owned packet buffers and maps.
pub extern crate alloc;
