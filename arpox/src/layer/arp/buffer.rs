//! Buffer for packets whose destination has not been resolved yet.
//!
//! Each unresolved destination gets at most one parked packet. It is released once the neighbor
//! announces itself, or forgotten after the minimum interval between two requests for the same
//! address has passed, at which point a new packet for that destination may trigger a new request.
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::time::{Duration, Instant};
use crate::wire::Ipv4Address;

/// A packet waiting for the resolution of its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending {
    protocol_addr: Ipv4Address,
    payload: Vec<u8>,
    queued_at: Instant,
}

/// A buffer of packets waiting for address resolution, one per destination.
#[derive(Debug, Clone)]
pub struct Buffer {
    storage: BTreeMap<Ipv4Address, Pending>,
    interval: Duration,
}

impl Buffer {
    /// Create an empty buffer whose entries expire `interval` after being queued.
    pub fn new(interval: Duration) -> Self {
        Buffer {
            storage: BTreeMap::new(),
            interval,
        }
    }

    /// If a packet for the address is waiting and has not expired.
    pub fn has_pending(&mut self, protocol_addr: Ipv4Address, timestamp: Instant) -> bool {
        self.alive(protocol_addr, timestamp).is_some()
    }

    /// Park a packet until its destination is resolved.
    ///
    /// Returns if the packet has been added to the buffer. It is rejected, and dropped, when there
    /// is already a packet waiting for the same address. An expired packet is replaced.
    pub fn offer(&mut self, protocol_addr: Ipv4Address, payload: Vec<u8>, timestamp: Instant) -> bool {
        if self.has_pending(protocol_addr, timestamp) {
            return false;
        }

        self.storage.insert(protocol_addr, Pending {
            protocol_addr,
            payload,
            queued_at: timestamp,
        });
        true
    }

    /// Remove and return the packet waiting for an address.
    ///
    /// Expired packets are discarded instead.
    pub fn take(&mut self, protocol_addr: Ipv4Address, timestamp: Instant) -> Option<Vec<u8>> {
        self.alive(protocol_addr, timestamp)?;
        self.storage.remove(&protocol_addr).map(|pending| pending.payload)
    }

    /// Discard all expired packets.
    ///
    /// Returns the number of discarded packets.
    pub fn purge(&mut self, timestamp: Instant) -> usize {
        let interval = self.interval;
        let before = self.storage.len();
        self.storage.retain(|_, pending| !pending.is_expired(timestamp, interval));
        before - self.storage.len()
    }

    /// Iterate over all waiting packets by ascending destination.
    ///
    /// This includes expired packets that have not yet been discarded.
    pub fn iter(&self) -> impl Iterator<Item=&Pending> + '_ {
        self.storage.values()
    }

    /// The number of parked packets, including expired ones that have not yet been discarded.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// If there are no parked packets at all.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Find the unexpired entry of an address, lazily discarding an expired one.
    fn alive(&mut self, protocol_addr: Ipv4Address, timestamp: Instant) -> Option<&Pending> {
        let expired = self.storage.get(&protocol_addr)?
            .is_expired(timestamp, self.interval);

        if expired {
            net_trace!("arp: pending packet for {} expired", protocol_addr);
            self.storage.remove(&protocol_addr);
            return None;
        }

        self.storage.get(&protocol_addr)
    }
}

impl Pending {
    /// The destination protocol address.
    pub fn protocol_addr(&self) -> Ipv4Address {
        self.protocol_addr
    }

    /// The parked payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The time the packet was parked.
    pub fn queued_at(&self) -> Instant {
        self.queued_at
    }

    fn is_expired(&self, ts: Instant, interval: Duration) -> bool {
        ts >= self.queued_at + interval
    }
}
