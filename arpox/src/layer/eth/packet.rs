use alloc::vec;

use crate::nic::Device;
use crate::layer::{Error, Result};
use crate::time::Instant;
use crate::wire::{EthernetAddress, EthernetProtocol, EthernetRepr, ethernet_frame};
use crate::wire::{ETHERNET_MAX_PAYLOAD_LEN, ETHERNET_MIN_PAYLOAD_LEN};

/// An incoming packet.
///
/// The contents were inspected and could be handled up to the eth layer.
pub struct In<'a> {
    /// A reference to the device and ethernet endpoint state.
    pub control: Controller<'a>,
    /// The valid ethernet frame, including any padding of the payload.
    pub frame: &'a ethernet_frame,
}

/// A reference to the endpoint of layers below (phy + eth).
///
/// Handed to a receiver for each frame and to the upper layers when they originate traffic. All
/// frames are sent with the hardware address of the ethernet endpoint as their source.
pub struct Controller<'a> {
    pub(crate) nic: &'a mut dyn Device,
    pub(crate) src_addr: EthernetAddress,
}

impl<'a> Controller<'a> {
    pub(crate) fn new(nic: &'a mut dyn Device, src_addr: EthernetAddress) -> Self {
        Controller { nic, src_addr, }
    }

    /// Get the configured (source) address of the ethernet endpoint.
    pub fn src_addr(&self) -> EthernetAddress {
        self.src_addr
    }

    /// The current time as reported by the device.
    pub fn timestamp(&self) -> Instant {
        self.nic.timestamp()
    }

    /// Frame a payload and hand it to the device.
    ///
    /// The payload is padded with zeros to the minimum ethernet payload length. Payloads longer
    /// than the maximum transmission unit are refused with `Error::BadSize` and nothing is sent.
    pub fn send(
        &mut self,
        payload: &[u8],
        dst_addr: EthernetAddress,
        ethertype: EthernetProtocol,
    ) -> Result<()> {
        if payload.len() > ETHERNET_MAX_PAYLOAD_LEN {
            return Err(Error::BadSize);
        }

        let padded = payload.len().max(ETHERNET_MIN_PAYLOAD_LEN);
        let mut buffer = vec![0; ethernet_frame::buffer_len(padded)];
        let frame = ethernet_frame::new_unchecked_mut(&mut buffer);
        EthernetRepr {
            src_addr: self.src_addr,
            dst_addr,
            ethertype,
        }.emit(frame);
        frame.payload_mut_slice()[..payload.len()].copy_from_slice(payload);

        self.nic.send(&buffer)
    }
}

impl In<'_> {
    /// The hardware address of the sender.
    pub fn src_addr(&self) -> EthernetAddress {
        self.frame.src_addr()
    }

    /// The payload of the frame.
    pub fn payload(&self) -> &[u8] {
        self.frame.payload_slice()
    }
}
