use core::{fmt, str::FromStr};

/// An ipv4 address in network byte order, as it appears in arp packets.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Address(pub [u8; 4]);

impl Address {
    /// `0.0.0.0`.
    pub const UNSPECIFIED: Address = Address([0; 4]);

    /// `255.255.255.255`, delivered to every host on the link without resolution.
    pub const BROADCAST: Address = Address([255; 4]);

    /// The address `a.b.c.d`.
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Address {
        Address([a, b, c, d])
    }

    /// Read an address from the first four octets of `data`.
    ///
    /// # Panics
    /// If `data` holds fewer than four octets.
    pub fn from_bytes(data: &[u8]) -> Address {
        let mut octets = [0; 4];
        octets.copy_from_slice(&data[..4]);
        Address(octets)
    }

    /// The four octets, most significant first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The limited broadcast address.
    pub fn is_broadcast(&self) -> bool {
        *self == Address::BROADCAST
    }

    /// Within `224.0.0.0/4`.
    pub fn is_multicast(&self) -> bool {
        self.0[0] >> 4 == 0xe
    }

    /// Within `0.0.0.0/8`, which names no host on the link.
    pub fn is_unspecified(&self) -> bool {
        self.0[0] == 0
    }

    /// An address that a single neighbor can own and answer for.
    pub fn is_unicast(&self) -> bool {
        !self.is_broadcast() && !self.is_multicast() && !self.is_unspecified()
    }
}

impl From<core::net::Ipv4Addr> for Address {
    fn from(x: core::net::Ipv4Addr) -> Address {
        Address(x.octets())
    }
}

impl From<Address> for core::net::Ipv4Addr {
    fn from(Address(x): Address) -> core::net::Ipv4Addr {
        x.into()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

impl FromStr for Address {
    type Err = core::net::AddrParseError;

    fn from_str(src: &str) -> core::result::Result<Self, Self::Err> {
        src.parse::<core::net::Ipv4Addr>().map(Address::from)
    }
}
