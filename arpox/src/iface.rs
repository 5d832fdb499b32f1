//! The interface context.
//!
//! An [`Interface`] is the single owner of all resolver state of one network interface: the
//! device, the ethernet endpoint with its table of protocol handlers and the arp endpoint
//! registered in that table. Frames are processed one at a time from [`poll`], each to completion.
//!
//! ```
//! use arpox::iface::Interface;
//! use arpox::layer::arp::{Config, Dispatch};
//! use arpox::nic::External;
//! use arpox::wire::{EthernetAddress, Ipv4Address};
//!
//! let mut iface = Interface::new(
//!     External::new(),
//!     EthernetAddress([0x02, 0, 0, 0, 0, 1]),
//!     Ipv4Address::new(10, 0, 0, 1),
//!     Config::default(),
//! ).expect("Unbounded device accepts the announcement");
//!
//! // The announcement of our own address.
//! assert_eq!(iface.device_mut().take_sent().len(), 1);
//!
//! let dispatch = iface.resolve_and_send(vec![0x45; 20], Ipv4Address::new(10, 0, 0, 2));
//! assert_eq!(dispatch, Ok(Dispatch::Pending));
//! ```
//!
//! [`Interface`]: struct.Interface.html
//! [`poll`]: struct.Interface.html#method.poll
use alloc::vec::Vec;

use crate::layer::{arp, eth, Error, Result};
use crate::nic::Device;
use crate::wire::{EthernetAddress, EthernetProtocol, Ipv4Address};

/// A network interface resolving ipv4 destinations with arp.
pub struct Interface<D> {
    device: D,
    eth: eth::Endpoint,
}

impl<D: Device> Interface<D> {
    /// Bring up an interface with a fixed identity.
    ///
    /// Registers the arp endpoint for its ethertype and announces the local mapping by
    /// broadcasting a request for the own protocol address.
    pub fn new(
        device: D,
        hardware_addr: EthernetAddress,
        protocol_addr: Ipv4Address,
        config: arp::Config,
    ) -> Result<Self> {
        let mut eth = eth::Endpoint::new(hardware_addr);
        eth.register(EthernetProtocol::Arp, arp::Endpoint::new(protocol_addr, config));

        let mut iface = Interface { device, eth };
        iface.announce()?;
        net_debug!("iface: up as {} at {}", protocol_addr, hardware_addr);
        Ok(iface)
    }

    /// Broadcast a request for the own protocol address.
    pub fn announce(&mut self) -> Result<()> {
        let (arp, control) = self.resolver()?;
        let addr = arp.addr();
        arp.request(addr, control)
    }

    /// Send an ipv4 packet to a neighbor.
    ///
    /// See [`arp::Endpoint::resolve_and_send`] for the possible outcomes.
    ///
    /// [`arp::Endpoint::resolve_and_send`]: ../layer/arp/struct.Endpoint.html#method.resolve_and_send
    pub fn resolve_and_send(&mut self, payload: Vec<u8>, dst_addr: Ipv4Address) -> Result<arp::Dispatch> {
        let (arp, control) = self.resolver()?;
        let dispatch = arp.resolve_and_send(payload, dst_addr, control)?;
        net_trace!("iface: packet to {}: {:?}", dst_addr, dispatch);
        Ok(dispatch)
    }

    /// Process one raw frame as if it had been received by the device.
    ///
    /// Frames that can not be handled are discarded, nothing is reported to the caller.
    pub fn on_frame_received(&mut self, frame: &[u8]) {
        if let Err(err) = self.eth.receive(frame, &mut self.device) {
            net_trace!("iface: discarded frame: {}", err);
        }
    }

    /// Process up to `max` frames from the device.
    ///
    /// Expired neighbors and packets whose resolution timed out are discarded first. Returns the
    /// number of frames taken from the device, the call never fails.
    pub fn poll(&mut self, max: usize) -> usize {
        let now = self.device.timestamp();
        if let Some(arp) = self.eth.handler_mut::<arp::Endpoint>(EthernetProtocol::Arp) {
            let evicted = arp.neighbors_mut().purge(now);
            if evicted > 0 {
                net_trace!("iface: evicted {} neighbors", evicted);
            }

            let dropped = arp.pending_mut().purge(now);
            if dropped > 0 {
                net_debug!("iface: dropped {} unanswered packets", dropped);
            }
        }

        let mut count = 0;
        while count < max {
            let frame = match self.device.receive() {
                Some(frame) => frame,
                None => break,
            };

            self.on_frame_received(&frame);
            count += 1;
        }

        count
    }

    /// The arp endpoint, unless it was unregistered from the ethernet endpoint.
    pub fn arp(&self) -> Option<&arp::Endpoint> {
        self.eth.handler(EthernetProtocol::Arp)
    }

    /// Mutable access to the arp endpoint.
    pub fn arp_mut(&mut self) -> Option<&mut arp::Endpoint> {
        self.eth.handler_mut(EthernetProtocol::Arp)
    }

    /// The neighbor cache of the arp endpoint.
    pub fn cache(&self) -> Option<&arp::NeighborCache> {
        self.arp().map(arp::Endpoint::neighbors)
    }

    /// Print the neighbor cache to standard out.
    #[cfg(feature = "std")]
    pub fn print_cache(&self) {
        if let Some(cache) = self.cache() {
            print!("{}", cache);
        }
    }

    /// The ethernet endpoint, for registering further protocols.
    pub fn ethernet(&self) -> &eth::Endpoint {
        &self.eth
    }

    /// Mutable access to the ethernet endpoint.
    pub fn ethernet_mut(&mut self) -> &mut eth::Endpoint {
        &mut self.eth
    }

    /// The underlying device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable access to the underlying device.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    fn resolver(&mut self) -> Result<(&mut arp::Endpoint, eth::Controller<'_>)> {
        self.eth.split::<arp::Endpoint>(EthernetProtocol::Arp, &mut self.device)
            .ok_or(Error::Illegal)
    }
}
