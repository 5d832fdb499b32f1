use core::fmt;

/// Why a received buffer could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The buffer ended before the last header field.
    Truncated,

    /// A well-formed packet of a kind this crate does not speak.
    ///
    /// E.g. arp for a hardware type other than ethernet. Other hosts on the link may legitimately
    /// use it, the packet is only ignored.
    Unrecognized,

    /// A recognized packet contradicts itself.
    ///
    /// E.g. Ethernet-IPv4 arp with address lengths other than 6 and 4, or an unknown operation.
    Malformed,

    /// No handler is registered for the ethertype of a frame.
    Unsupported,
}

/// Result of decoding a buffer.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Truncated => f.write_str("packet ends inside its header"),
            Error::Unrecognized => f.write_str("packet of unrecognized kind"),
            Error::Malformed => f.write_str("contradictory packet header"),
            Error::Unsupported => f.write_str("no handler for protocol"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
