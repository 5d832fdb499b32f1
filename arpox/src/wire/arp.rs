use byteorder::{ByteOrder, NetworkEndian};
use core::fmt;

use super::{Error, Result};
use super::{EthernetAddress, EthernetProtocol, Ipv4Address};

enum_with_unknown! {
    /// The link layer named in the htype field.
    pub enum Hardware(u16) {
        /// Ethernet, with six octet addresses.
        Ethernet = 1
    }
}

enum_with_unknown! {
    /// The oper field.
    pub enum Operation(u16) {
        /// Who has the target protocol address?
        Request = 1,
        /// The sender has the sender protocol address.
        Reply = 2
    }
}

byte_wrapper!{
    /// An arp packet with address fields of the lengths stated in its own header.
    #[derive(Debug, PartialEq, Eq)]
    pub struct arp([u8]);
}

mod field {
    use crate::wire::field::*;

    pub(crate) const HTYPE: Field = 0..2;
    pub(crate) const PTYPE: Field = 2..4;
    pub(crate) const HLEN: usize = 4;
    pub(crate) const PLEN: usize = 5;
    pub(crate) const OPER: Field = 6..8;

    /// Sender hardware, sender protocol, target hardware and target protocol address.
    pub(crate) struct Addresses {
        pub(crate) sha: Field,
        pub(crate) spa: Field,
        pub(crate) tha: Field,
        pub(crate) tpa: Field,
    }

    pub(crate) fn addresses(hlen: u8, plen: u8) -> Addresses {
        let (hlen, plen) = (usize::from(hlen), usize::from(plen));
        let sha = OPER.end..OPER.end + hlen;
        let spa = sha.end..sha.end + plen;
        let tha = spa.end..spa.end + hlen;
        let tpa = tha.end..tha.end + plen;
        Addresses { sha, spa, tha, tpa }
    }
}

/// Size of an arp packet for ethernet and ipv4 addresses.
pub const ETHERNET_IPV4_LEN: usize = 28;

impl arp {
    /// View bytes as an arp packet without any length check.
    pub fn new_unchecked(buffer: &[u8]) -> &Self {
        Self::__from_macro_new_unchecked(buffer)
    }

    /// View mutable bytes as an arp packet without any length check.
    pub fn new_unchecked_mut(buffer: &mut [u8]) -> &mut Self {
        Self::__from_macro_new_unchecked_mut(buffer)
    }

    /// View bytes as an arp packet, failing with `Truncated` if the addresses do not fit.
    pub fn new_checked(data: &[u8]) -> Result<&Self> {
        let packet = Self::new_unchecked(data);
        packet.check_len()?;
        Ok(packet)
    }

    /// Check that the fixed header and all four addresses are present.
    ///
    /// Bytes after the last address, such as ethernet padding, are ignored.
    pub fn check_len(&self) -> Result<()> {
        if self.0.len() < field::OPER.end {
            return Err(Error::Truncated);
        }

        if self.0.len() < self.addresses().tpa.end {
            return Err(Error::Truncated);
        }

        Ok(())
    }

    fn addresses(&self) -> field::Addresses {
        field::addresses(self.hardware_len(), self.protocol_len())
    }

    /// The kind of hardware addresses.
    pub fn hardware_type(&self) -> Hardware {
        NetworkEndian::read_u16(&self.0[field::HTYPE]).into()
    }

    /// The kind of protocol addresses, numbered like ethertypes.
    pub fn protocol_type(&self) -> EthernetProtocol {
        NetworkEndian::read_u16(&self.0[field::PTYPE]).into()
    }

    /// Octets per hardware address.
    pub fn hardware_len(&self) -> u8 {
        self.0[field::HLEN]
    }

    /// Octets per protocol address.
    pub fn protocol_len(&self) -> u8 {
        self.0[field::PLEN]
    }

    #[allow(missing_docs)]
    pub fn operation(&self) -> Operation {
        NetworkEndian::read_u16(&self.0[field::OPER]).into()
    }

    #[allow(missing_docs)]
    pub fn source_hardware_addr(&self) -> &[u8] {
        &self.0[self.addresses().sha]
    }

    #[allow(missing_docs)]
    pub fn source_protocol_addr(&self) -> &[u8] {
        &self.0[self.addresses().spa]
    }

    #[allow(missing_docs)]
    pub fn target_hardware_addr(&self) -> &[u8] {
        &self.0[self.addresses().tha]
    }

    #[allow(missing_docs)]
    pub fn target_protocol_addr(&self) -> &[u8] {
        &self.0[self.addresses().tpa]
    }

    /// Write the fixed header, which determines where the addresses are placed.
    pub fn set_header(&mut self, hardware: Hardware, protocol: EthernetProtocol, operation: Operation) {
        NetworkEndian::write_u16(&mut self.0[field::HTYPE], hardware.into());
        NetworkEndian::write_u16(&mut self.0[field::PTYPE], protocol.into());
        NetworkEndian::write_u16(&mut self.0[field::OPER], operation.into());
    }

    /// Write the address lengths.
    ///
    /// Invalidates a previous `check_len`.
    pub fn set_lengths(&mut self, hardware_len: u8, protocol_len: u8) {
        self.0[field::HLEN] = hardware_len;
        self.0[field::PLEN] = protocol_len;
    }

    /// Write the sender addresses.
    ///
    /// # Panics
    /// If the slices do not match the lengths in the header or the buffer is too short.
    pub fn set_source(&mut self, hardware: &[u8], protocol: &[u8]) {
        let fields = self.addresses();
        self.0[fields.sha].copy_from_slice(hardware);
        self.0[fields.spa].copy_from_slice(protocol);
    }

    /// Write the target addresses.
    ///
    /// # Panics
    /// If the slices do not match the lengths in the header or the buffer is too short.
    pub fn set_target(&mut self, hardware: &[u8], protocol: &[u8]) {
        let fields = self.addresses();
        self.0[fields.tha].copy_from_slice(hardware);
        self.0[fields.tpa].copy_from_slice(protocol);
    }
}

/// A decoded arp packet.
///
/// Ethernet with ipv4 is the only combination that can be represented. Anything else fails to
/// parse.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Repr {
    /// Resolution of an ipv4 address to an ethernet address.
    EthernetIpv4 {
        /// Request or reply.
        operation: Operation,
        /// Sender hardware address, always learned by the receiver.
        source_hardware_addr: EthernetAddress,
        /// Sender protocol address.
        source_protocol_addr: Ipv4Address,
        /// Target hardware address, all zero in requests.
        target_hardware_addr: EthernetAddress,
        /// The address asked about in a request, the requester in a reply.
        target_protocol_addr: Ipv4Address,
    },
}

impl Repr {
    /// Decode a packet.
    ///
    /// Fails with `Unrecognized` for any hardware type but ethernet or any protocol type but
    /// ipv4. Fails with `Malformed` when the stated lengths are not 6 and 4 or the operation is
    /// unknown.
    pub fn parse(packet: &arp) -> Result<Repr> {
        packet.check_len()?;

        if packet.hardware_type() != Hardware::Ethernet
            || packet.protocol_type() != EthernetProtocol::Ipv4
        {
            return Err(Error::Unrecognized);
        }

        if (packet.hardware_len(), packet.protocol_len()) != (6, 4) {
            return Err(Error::Malformed);
        }

        let operation = match packet.operation() {
            Operation::Unknown(_) => return Err(Error::Malformed),
            known => known,
        };

        Ok(Repr::EthernetIpv4 {
            operation,
            source_hardware_addr: EthernetAddress::from_bytes(packet.source_hardware_addr()),
            source_protocol_addr: Ipv4Address::from_bytes(packet.source_protocol_addr()),
            target_hardware_addr: EthernetAddress::from_bytes(packet.target_hardware_addr()),
            target_protocol_addr: Ipv4Address::from_bytes(packet.target_protocol_addr()),
        })
    }

    /// Octets needed by `emit`.
    pub fn buffer_len(&self) -> usize {
        match self {
            Repr::EthernetIpv4 { .. } => ETHERNET_IPV4_LEN,
        }
    }

    /// Encode into the first `buffer_len()` octets of `packet`.
    ///
    /// # Panics
    /// If the packet is shorter than `buffer_len()`.
    pub fn emit(&self, packet: &mut arp) {
        let Repr::EthernetIpv4 {
            operation,
            source_hardware_addr,
            source_protocol_addr,
            target_hardware_addr,
            target_protocol_addr,
        } = *self;

        packet.set_header(Hardware::Ethernet, EthernetProtocol::Ipv4, operation);
        packet.set_lengths(6, 4);
        packet.set_source(source_hardware_addr.as_bytes(), source_protocol_addr.as_bytes());
        packet.set_target(target_hardware_addr.as_bytes(), target_protocol_addr.as_bytes());
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Repr::EthernetIpv4 {
            operation,
            source_hardware_addr,
            source_protocol_addr,
            target_protocol_addr,
            ..
        } = self;

        match operation {
            Operation::Request => write!(f, "arp who-has {} tell {} ({})",
                target_protocol_addr, source_protocol_addr, source_hardware_addr),
            _ => write!(f, "arp {} is-at {}",
                source_protocol_addr, source_hardware_addr),
        }
    }
}
