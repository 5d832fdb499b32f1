//! Receiving and sending ARP messages.
//!
//! Restricted to ethernet hardware and ipv4 protocol addresses. The [`Endpoint`] is registered as
//! the handler for the arp ethertype and resolves destinations of outgoing ipv4 packets.
//!
//! [`Endpoint`]: struct.Endpoint.html
mod buffer;
mod endpoint;
mod neighbor;
#[cfg(test)]
mod tests;

pub use buffer::{
    Buffer as PendingBuffer,
    Pending,
};

pub use endpoint::{
    Config,
    Dispatch,
    Endpoint,
};

pub use neighbor::{
    Cache as NeighborCache,
    Neighbor,
};
