use alloc::boxed::Box;
use alloc::collections::BTreeMap;

use crate::nic::Device;
use crate::wire::{self, EthernetAddress, EthernetProtocol, EthernetRepr, ethernet_frame};

use super::Recv;
use super::packet::{Controller, In};

/// The ethernet endpoint of an interface.
///
/// Does not filter frames by their destination address, the device is expected to only deliver
/// frames that were meant for this host.
pub struct Endpoint {
    /// Our own address.
    addr: EthernetAddress,

    /// Upper protocol handlers by raw ethertype value.
    protocols: BTreeMap<u16, Box<dyn Recv>>,
}

impl Endpoint {
    /// Create an endpoint with the given hardware address and no registered protocols.
    pub fn new(addr: EthernetAddress) -> Self {
        Endpoint {
            addr,
            protocols: BTreeMap::new(),
        }
    }

    /// The hardware address used as the source of all sent frames.
    pub fn src_addr(&self) -> EthernetAddress {
        self.addr
    }

    /// Register the handler for an ethertype.
    ///
    /// Returns the handler that was previously registered for it, if any.
    pub fn register<H>(&mut self, ethertype: EthernetProtocol, handler: H) -> Option<Box<dyn Recv>>
        where H: Recv + 'static,
    {
        self.protocols.insert(ethertype.into(), Box::new(handler))
    }

    /// Remove the handler of an ethertype.
    pub fn unregister(&mut self, ethertype: EthernetProtocol) -> Option<Box<dyn Recv>> {
        self.protocols.remove(&ethertype.into())
    }

    /// Access the handler of an ethertype, if it has type `T`.
    pub fn handler<T: Recv + 'static>(&self, ethertype: EthernetProtocol) -> Option<&T> {
        let boxed = self.protocols.get(&ethertype.into())?;
        (**boxed).as_any().downcast_ref()
    }

    /// Mutably access the handler of an ethertype, if it has type `T`.
    pub fn handler_mut<T: Recv + 'static>(&mut self, ethertype: EthernetProtocol) -> Option<&mut T> {
        let boxed = self.protocols.get_mut(&ethertype.into())?;
        (**boxed).as_any_mut().downcast_mut()
    }

    /// Access a handler together with a controller for sending on the device.
    ///
    /// This is how upper layers originate traffic outside of the receive path.
    pub fn split<'a, T: Recv + 'static>(
        &'a mut self,
        ethertype: EthernetProtocol,
        nic: &'a mut dyn Device,
    ) -> Option<(&'a mut T, Controller<'a>)> {
        let addr = self.addr;
        let handler = self.handler_mut(ethertype)?;
        Some((handler, Controller::new(nic, addr)))
    }

    /// A controller for sending on the device, without any handler.
    pub fn controller<'a>(&self, nic: &'a mut dyn Device) -> Controller<'a> {
        Controller::new(nic, self.addr)
    }

    /// Dispatch one received frame to the handler of its ethertype.
    ///
    /// Returns `Err(Error::Truncated)` for frames too short to contain an ethernet header and
    /// `Err(Error::Unsupported)` if no handler was registered for the ethertype. In both cases the
    /// frame has been discarded without any other effect.
    pub fn receive(&mut self, data: &[u8], nic: &mut dyn Device) -> wire::Result<()> {
        let frame = ethernet_frame::new_checked(data)?;
        let repr = EthernetRepr::parse(frame)?;

        let handler = match self.protocols.get_mut(&repr.ethertype.into()) {
            Some(handler) => handler,
            None => {
                net_trace!("eth: no handler for ethertype {}", repr.ethertype);
                return Err(wire::Error::Unsupported);
            },
        };

        let control = Controller::new(nic, self.addr);
        handler.receive(In { control, frame });
        Ok(())
    }
}
