/*! Byte level access to ethernet frames and arp packets.

Every protocol comes in two forms here:

 * A byte view, named in lowercase ([`ethernet_frame`], [`arp_packet`]), wraps a borrowed `[u8]`
   and reads or writes single fields in place.
 * A `Repr` ([`EthernetRepr`], [`ArpRepr`]) holds the decoded header by value. `parse` builds it
   from a byte view and `emit` writes it back.

[`ethernet_frame`]: struct.ethernet_frame.html
[`arp_packet`]: struct.arp_packet.html
[`EthernetRepr`]: struct.EthernetRepr.html
[`ArpRepr`]: enum.ArpRepr.html

Multi-octet fields are big endian on the wire. Swapping happens in the accessors of the byte views
and nowhere else.

After `check_len` succeeded, or a view was obtained through `new_checked`, no accessor panics.
`parse` performs that check itself and never panics. `emit` panics only when handed a buffer
shorter than the representation needs.

# Examples

Encoding a request and decoding it again:

```rust
use arpox::wire::*;
let repr = ArpRepr::EthernetIpv4 {
    operation: ArpOperation::Request,
    source_hardware_addr: EthernetAddress([0x02, 0, 0, 0, 0, 1]),
    source_protocol_addr: Ipv4Address::new(10, 0, 0, 1),
    target_hardware_addr: EthernetAddress::UNSPECIFIED,
    target_protocol_addr: Ipv4Address::new(10, 0, 0, 2),
};
let mut buffer = vec![0; repr.buffer_len()];
repr.emit(arp_packet::new_unchecked_mut(&mut buffer));

let packet = arp_packet::new_checked(&buffer)
    .expect("truncated packet");
let parsed = ArpRepr::parse(packet)
    .expect("malformed packet");
assert_eq!(repr, parsed);
```
*/
// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
//
// Applies to files in this folder unless otherwise noted. These are:
// * `arp.rs`
// * `error.rs`
// * `ethernet.rs`
// * `ipv4.rs`
// * `mod.rs` (this file)

mod field {
    pub(crate) type Field = ::core::ops::Range<usize>;
    pub(crate) type Rest  = ::core::ops::RangeFrom<usize>;
}

mod error;
mod ethernet;
mod ipv4;
mod arp;

pub use self::ethernet::{
    ethernet as ethernet_frame,
    EtherType as EthernetProtocol,
    Address as EthernetAddress,
    ParseAddressError as EthernetParseError,
    Repr as EthernetRepr,
    MIN_PAYLOAD_LEN as ETHERNET_MIN_PAYLOAD_LEN,
    MAX_PAYLOAD_LEN as ETHERNET_MAX_PAYLOAD_LEN};

pub use self::error::{
    Error,
    Result};

pub use self::arp::{
    arp as arp_packet,
    Hardware as ArpHardware,
    Operation as ArpOperation,
    Repr as ArpRepr,
    ETHERNET_IPV4_LEN as ARP_ETHERNET_IPV4_LEN};

pub use self::ipv4::{
    Address as Ipv4Address};
