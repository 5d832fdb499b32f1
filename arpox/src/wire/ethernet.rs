use core::{fmt, str::FromStr};
use byteorder::{ByteOrder, NetworkEndian};

use crate::wire::{Error, Result};

enum_with_unknown! {
    /// The protocol number in the type field of an Ethernet II header.
    pub enum EtherType(u16) {
        /// IPv4 datagrams, the payload of resolved sends.
        Ipv4 = 0x0800,
        /// Address resolution packets.
        Arp  = 0x0806,
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            EtherType::Ipv4 => "IPv4",
            EtherType::Arp => "ARP",
            EtherType::Unknown(id) => return write!(f, "0x{:04x}", id),
        };
        f.write_str(name)
    }
}

/// Payloads shorter than this are zero padded on transmission.
pub const MIN_PAYLOAD_LEN: usize = 46;

/// Payloads longer than this are refused, jumbo frames are not supported.
pub const MAX_PAYLOAD_LEN: usize = 1500;

/// A 48-bit hardware address.
///
/// Displayed as six lowercase hex octets separated by dashes, `02-00-00-00-00-01`.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Address(pub [u8; 6]);

impl Address {
    /// The destination of arp requests, received by every station on the link.
    pub const BROADCAST: Address = Address([0xff; 6]);

    /// Placeholder for the unknown target hardware address of an arp request.
    pub const UNSPECIFIED: Address = Address([0; 6]);

    /// Read an address from the first six octets of `data`.
    ///
    /// # Panics
    /// If `data` holds fewer than six octets.
    pub fn from_bytes(data: &[u8]) -> Address {
        let mut octets = [0; 6];
        octets.copy_from_slice(&data[..6]);
        Address(octets)
    }

    /// The six octets in transmission order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether this is `ff-ff-ff-ff-ff-ff`.
    pub fn is_broadcast(&self) -> bool {
        *self == Address::BROADCAST
    }

    /// Whether the group bit of the first octet is set, which includes broadcast.
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 == 0x01
    }

    /// Whether the address names a single station.
    pub fn is_unicast(&self) -> bool {
        !self.is_multicast()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (idx, octet) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("-")?;
            }
            write!(f, "{:02x}", octet)?;
        }
        Ok(())
    }
}

/// An ethernet address string could not be parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseAddressError {
    /// Not exactly six octets were given.
    Length,
    /// An octet was not a hex number below 256.
    Octet,
}

impl fmt::Display for ParseAddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseAddressError::Length => f.write_str("ethernet address needs six octets"),
            ParseAddressError::Octet => f.write_str("invalid octet in ethernet address"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseAddressError {}

/// Accepts octets separated by either colons or dashes.
impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(src: &str) -> core::result::Result<Self, ParseAddressError> {
        let mut octets = [0u8; 6];
        let mut count = 0;
        for part in src.split(&[':', '-'][..]) {
            let slot = octets.get_mut(count).ok_or(ParseAddressError::Length)?;
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|c| c.is_ascii_hexdigit()) {
                return Err(ParseAddressError::Octet);
            }
            *slot = u8::from_str_radix(part, 16).map_err(|_| ParseAddressError::Octet)?;
            count += 1;
        }

        if count == octets.len() {
            Ok(Address(octets))
        } else {
            Err(ParseAddressError::Length)
        }
    }
}

byte_wrapper! {
    /// An Ethernet II frame: two addresses, the ethertype and the payload.
    #[derive(Debug, PartialEq, Eq)]
    pub struct ethernet([u8]);
}

mod field {
    use crate::wire::field::*;

    pub(crate) const DESTINATION: Field =  0..6;
    pub(crate) const SOURCE:      Field =  6..12;
    pub(crate) const ETHERTYPE:   Field = 12..14;
    pub(crate) const PAYLOAD:     Rest  = 14..;
}

impl ethernet {
    /// View bytes as a frame without any length check.
    pub fn new_unchecked(data: &[u8]) -> &Self {
        Self::__from_macro_new_unchecked(data)
    }

    /// View mutable bytes as a frame without any length check.
    pub fn new_unchecked_mut(data: &mut [u8]) -> &mut Self {
        Self::__from_macro_new_unchecked_mut(data)
    }

    /// View bytes as a frame, failing with `Truncated` if the header does not fit.
    pub fn new_checked(data: &[u8]) -> Result<&Self> {
        let frame = Self::new_unchecked(data);
        frame.check_len()?;
        Ok(frame)
    }

    /// Check that the complete header is present.
    ///
    /// Afterwards none of the accessors panics. The payload may be empty.
    pub fn check_len(&self) -> Result<()> {
        if self.0.len() < field::PAYLOAD.start {
            return Err(Error::Truncated);
        }
        Ok(())
    }

    /// Size of a frame buffer carrying `payload_len` payload octets.
    pub fn buffer_len(payload_len: usize) -> usize {
        field::PAYLOAD.start + payload_len
    }

    /// All octets of the frame, header included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The hardware address the frame is sent to.
    pub fn dst_addr(&self) -> Address {
        Address::from_bytes(&self.0[field::DESTINATION])
    }

    /// The hardware address the frame was sent from.
    pub fn src_addr(&self) -> Address {
        Address::from_bytes(&self.0[field::SOURCE])
    }

    /// The payload protocol. 802.1Q tags are not recognized.
    pub fn ethertype(&self) -> EtherType {
        NetworkEndian::read_u16(&self.0[field::ETHERTYPE]).into()
    }

    #[allow(missing_docs)]
    pub fn set_dst_addr(&mut self, addr: Address) {
        self.0[field::DESTINATION].copy_from_slice(&addr.0)
    }

    #[allow(missing_docs)]
    pub fn set_src_addr(&mut self, addr: Address) {
        self.0[field::SOURCE].copy_from_slice(&addr.0)
    }

    #[allow(missing_docs)]
    pub fn set_ethertype(&mut self, ethertype: EtherType) {
        NetworkEndian::write_u16(&mut self.0[field::ETHERTYPE], ethertype.into())
    }

    /// Everything after the header, padding included.
    pub fn payload_slice(&self) -> &[u8] {
        &self.0[field::PAYLOAD]
    }

    /// Mutable access to everything after the header.
    pub fn payload_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0[field::PAYLOAD]
    }
}

impl fmt::Display for ethernet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} > {} {} ({} octets)",
            self.src_addr(), self.dst_addr(), self.ethertype(), self.payload_slice().len())
    }
}

/// The decoded header of an Ethernet II frame.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Repr {
    /// Sender hardware address.
    pub src_addr: Address,
    /// Receiver hardware address, possibly broadcast.
    pub dst_addr: Address,
    /// Protocol of the payload.
    pub ethertype: EtherType,
}

impl Repr {
    /// Decode the header of a frame.
    pub fn parse(frame: &ethernet) -> Result<Repr> {
        frame.check_len()?;
        Ok(Repr {
            src_addr: frame.src_addr(),
            dst_addr: frame.dst_addr(),
            ethertype: frame.ethertype(),
        })
    }

    /// Encode the header into the first 14 octets of `frame`, the payload is left untouched.
    pub fn emit(&self, frame: &mut ethernet) {
        frame.set_dst_addr(self.dst_addr);
        frame.set_src_addr(self.src_addr);
        frame.set_ethertype(self.ethertype);
    }
}
