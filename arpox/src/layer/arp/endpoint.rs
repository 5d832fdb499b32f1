//! As noted in RFC 826, arp assumes that at least the mapping and identities of the own host are
//! fully known to the resolver. Every well-formed packet, request or reply, teaches us the mapping
//! of its sender. Packets towards an unknown destination are parked, one per destination, while a
//! request for it is underway.
use alloc::vec::Vec;

use crate::layer::{eth, Error, Result};
use crate::time::Duration;
use crate::wire::{arp_packet, ArpOperation, ArpRepr, ARP_ETHERNET_IPV4_LEN};
use crate::wire::{EthernetAddress, EthernetProtocol, ETHERNET_MAX_PAYLOAD_LEN, Ipv4Address};

use super::buffer::Buffer;
use super::neighbor::Cache;

/// Timing parameters of the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
    /// How long a learned mapping is served after its last update.
    pub entry_lifetime: Duration,

    /// Minimum delay between two requests for the same address.
    ///
    /// This is also the time a packet is parked waiting for the resolution of its destination.
    pub request_interval: Duration,
}

/// What happened to a packet handed to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dispatch {
    /// The destination was known and the packet has been framed towards it.
    Sent(EthernetAddress),

    /// A request has been broadcast and the packet is parked until it is answered.
    Pending,

    /// A request for the destination is already underway and the packet was dropped.
    Dropped,
}

/// An arp traffic handler.
///
/// Owns the neighbor cache and the buffer of packets waiting for resolution. Registered with the
/// ethernet endpoint it answers requests for its own address and releases parked packets as
/// their destinations announce themselves.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Our own protocol address.
    addr: Ipv4Address,

    neighbors: Cache,

    pending: Buffer,
}

impl Endpoint {
    /// Create the resolver for a local protocol address.
    pub fn new(addr: Ipv4Address, config: Config) -> Self {
        Endpoint {
            addr,
            neighbors: Cache::new(config.entry_lifetime),
            pending: Buffer::new(config.request_interval),
        }
    }

    /// The local protocol address.
    pub fn addr(&self) -> Ipv4Address {
        self.addr
    }

    /// The neighbor cache.
    pub fn neighbors(&self) -> &Cache {
        &self.neighbors
    }

    /// Mutable access to the neighbor cache, for static entries and eviction.
    pub fn neighbors_mut(&mut self) -> &mut Cache {
        &mut self.neighbors
    }

    /// The packets waiting for resolution.
    pub fn pending(&self) -> &Buffer {
        &self.pending
    }

    /// Mutable access to the packets waiting for resolution, for eviction.
    pub fn pending_mut(&mut self) -> &mut Buffer {
        &mut self.pending
    }

    /// Send a packet to a neighbor, resolving its hardware address first if necessary.
    ///
    /// A known destination gets the packet immediately. Otherwise a request is broadcast and the
    /// packet parked, unless a request for the destination is already underway in which case the
    /// packet is dropped. If the request can not be sent the packet is not parked.
    ///
    /// Multicast and unspecified destinations can not be resolved and are `Unreachable`. So is the
    /// local address, since no neighbor would ever answer a request for it.
    pub fn resolve_and_send(
        &mut self,
        payload: Vec<u8>,
        dst_addr: Ipv4Address,
        mut control: eth::Controller<'_>,
    ) -> Result<Dispatch> {
        if dst_addr.is_multicast() || dst_addr.is_unspecified() || dst_addr == self.addr {
            return Err(Error::Unreachable);
        }

        if payload.len() > ETHERNET_MAX_PAYLOAD_LEN {
            return Err(Error::BadSize);
        }

        let now = control.timestamp();
        if let Some(hardware_addr) = self.neighbors.lookup(dst_addr, now) {
            control.send(&payload, hardware_addr, EthernetProtocol::Ipv4)?;
            return Ok(Dispatch::Sent(hardware_addr));
        }

        if self.pending.has_pending(dst_addr, now) {
            net_debug!("arp: request for {} underway, dropping packet", dst_addr);
            return Ok(Dispatch::Dropped);
        }

        self.send_request(dst_addr, &mut control)?;
        let parked = self.pending.offer(dst_addr, payload, now);
        debug_assert!(parked, "Offer after checking for pending packet must succeed");
        Ok(Dispatch::Pending)
    }

    /// Broadcast a request for the hardware address of `target_addr`.
    ///
    /// Does not touch the buffer of pending packets. Requesting the own address announces the
    /// local mapping to all neighbors.
    pub fn request(&mut self, target_addr: Ipv4Address, mut control: eth::Controller<'_>) -> Result<()> {
        self.send_request(target_addr, &mut control)
    }

    fn send_request(&self, target_addr: Ipv4Address, control: &mut eth::Controller<'_>) -> Result<()> {
        let repr = ArpRepr::EthernetIpv4 {
            operation: ArpOperation::Request,
            source_hardware_addr: control.src_addr(),
            source_protocol_addr: self.addr,
            target_hardware_addr: EthernetAddress::UNSPECIFIED,
            target_protocol_addr: target_addr,
        };

        net_trace!("arp: requesting {}", target_addr);
        emit(repr, EthernetAddress::BROADCAST, control)
    }

    fn send_reply(
        &self,
        target_addr: Ipv4Address,
        target_hardware_addr: EthernetAddress,
        control: &mut eth::Controller<'_>,
    ) -> Result<()> {
        let repr = ArpRepr::EthernetIpv4 {
            operation: ArpOperation::Reply,
            source_hardware_addr: control.src_addr(),
            source_protocol_addr: self.addr,
            target_hardware_addr,
            target_protocol_addr: target_addr,
        };

        net_trace!("arp: answering {} at {}", target_addr, target_hardware_addr);
        emit(repr, target_hardware_addr, control)
    }

    /// Handle a valid packet.
    ///
    /// See [RFC826] for details.
    ///
    /// [RFC826]: https://tools.ietf.org/html/rfc826
    fn handle(&mut self, repr: ArpRepr, mut control: eth::Controller<'_>) {
        let ArpRepr::EthernetIpv4 {
            operation,
            source_hardware_addr,
            source_protocol_addr,
            target_hardware_addr: _,
            target_protocol_addr,
        } = repr;

        let now = control.timestamp();
        self.neighbors.fill(source_protocol_addr, source_hardware_addr, now);

        if let Some(payload) = self.pending.take(source_protocol_addr, now) {
            match control.send(&payload, source_hardware_addr, EthernetProtocol::Ipv4) {
                Ok(()) => {
                    net_debug!("arp: released pending packet to {}", source_protocol_addr);
                },
                Err(err) => {
                    net_debug!("arp: pending packet to {} lost: {}", source_protocol_addr, err);
                },
            }
        }

        if operation == ArpOperation::Request && target_protocol_addr == self.addr {
            if let Err(err) = self.send_reply(source_protocol_addr, source_hardware_addr, &mut control) {
                net_debug!("arp: reply to {} failed: {}", source_protocol_addr, err);
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            entry_lifetime: Duration::from_secs(60),
            request_interval: Duration::from_secs(1),
        }
    }
}

impl eth::Recv for Endpoint {
    fn receive(&mut self, eth::InPacket { control, frame }: eth::InPacket) {
        let repr = match arp_packet::new_checked(frame.payload_slice()).and_then(ArpRepr::parse) {
            Ok(repr) => repr,
            Err(err) => {
                net_trace!("arp: discarding packet from {}: {}", frame.src_addr(), err);
                return;
            },
        };

        self.handle(repr, control)
    }
}

fn emit(repr: ArpRepr, dst_addr: EthernetAddress, control: &mut eth::Controller<'_>) -> Result<()> {
    let mut buffer = [0; ARP_ETHERNET_IPV4_LEN];
    repr.emit(arp_packet::new_unchecked_mut(&mut buffer));
    control.send(&buffer, dst_addr, EthernetProtocol::Arp)
}
