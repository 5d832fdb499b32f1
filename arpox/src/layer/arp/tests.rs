use alloc::vec::Vec;

use crate::nic::{Device, External};
use crate::layer::{eth, Error, Result};
use crate::time::Instant;
use crate::wire::{arp_packet, ethernet_frame, ArpOperation, ArpRepr};
use crate::wire::{EthernetAddress, EthernetProtocol, EthernetRepr, Ipv4Address};
use crate::wire::ETHERNET_MIN_PAYLOAD_LEN;

use super::{Config, Dispatch, Endpoint};

const MAC_ADDR_HOST: EthernetAddress = EthernetAddress([0x02, 0, 0, 0, 0, 0xaa]);
const IP_ADDR_HOST: Ipv4Address = Ipv4Address::new(10, 0, 0, 1);
const MAC_ADDR_OTHER: EthernetAddress = EthernetAddress([0x02, 0, 0, 0, 0, 0xbb]);
const IP_ADDR_OTHER: Ipv4Address = Ipv4Address::new(10, 0, 0, 2);
const MAC_ADDR_THIRD: EthernetAddress = EthernetAddress([0x02, 0, 0, 0, 0, 0xcc]);
const IP_ADDR_THIRD: Ipv4Address = Ipv4Address::new(10, 0, 0, 3);

const PAYLOAD: [u8; 8] = [0x45, 0, 0, 8, 0xde, 0xad, 0xbe, 0xef];

fn setup() -> (External, eth::Endpoint) {
    let mut eth = eth::Endpoint::new(MAC_ADDR_HOST);
    eth.register(EthernetProtocol::Arp, Endpoint::new(IP_ADDR_HOST, Config::default()));
    (External::new(), eth)
}

fn arp(eth: &eth::Endpoint) -> &Endpoint {
    eth.handler::<Endpoint>(EthernetProtocol::Arp)
        .expect("Arp endpoint registered in setup")
}

fn send(eth: &mut eth::Endpoint, nic: &mut External, payload: &[u8], dst: Ipv4Address)
    -> Result<Dispatch>
{
    let (arp, control) = eth.split::<Endpoint>(EthernetProtocol::Arp, nic)
        .expect("Arp endpoint registered in setup");
    arp.resolve_and_send(payload.to_vec(), dst, control)
}

/// An incoming arp packet from `src` towards `tgt`, as another host would frame it.
fn arp_frame(
    operation: ArpOperation,
    src: (EthernetAddress, Ipv4Address),
    tgt: (EthernetAddress, Ipv4Address),
) -> Vec<u8> {
    let dst_addr = match operation {
        ArpOperation::Request => EthernetAddress::BROADCAST,
        _ => tgt.0,
    };

    let mut buffer = vec![0; ethernet_frame::buffer_len(ETHERNET_MIN_PAYLOAD_LEN)];
    let frame = ethernet_frame::new_unchecked_mut(&mut buffer);
    EthernetRepr {
        src_addr: src.0,
        dst_addr,
        ethertype: EthernetProtocol::Arp,
    }.emit(frame);
    ArpRepr::EthernetIpv4 {
        operation,
        source_hardware_addr: src.0,
        source_protocol_addr: src.1,
        target_hardware_addr: tgt.0,
        target_protocol_addr: tgt.1,
    }.emit(arp_packet::new_unchecked_mut(frame.payload_mut_slice()));
    buffer
}

fn sent_arp(frame: &[u8]) -> (EthernetRepr, ArpRepr) {
    let frame = ethernet_frame::new_checked(frame).unwrap();
    let eth = EthernetRepr::parse(frame).unwrap();
    assert_eq!(eth.ethertype, EthernetProtocol::Arp);
    let packet = arp_packet::new_checked(frame.payload_slice()).unwrap();
    (eth, ArpRepr::parse(packet).unwrap())
}

fn request_for(target: Ipv4Address) -> ArpRepr {
    ArpRepr::EthernetIpv4 {
        operation: ArpOperation::Request,
        source_hardware_addr: MAC_ADDR_HOST,
        source_protocol_addr: IP_ADDR_HOST,
        target_hardware_addr: EthernetAddress::UNSPECIFIED,
        target_protocol_addr: target,
    }
}

#[test]
fn unknown_destination_requests_once() {
    let (mut nic, mut eth) = setup();

    assert_eq!(arp(&eth).neighbors().lookup(IP_ADDR_OTHER, nic.timestamp()), None);
    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, IP_ADDR_OTHER), Ok(Dispatch::Pending));

    let sent = nic.take_sent();
    assert_eq!(sent.len(), 1);
    let (frame, request) = sent_arp(&sent[0]);
    assert_eq!(frame.dst_addr, EthernetAddress::BROADCAST);
    assert_eq!(frame.src_addr, MAC_ADDR_HOST);
    assert_eq!(request, request_for(IP_ADDR_OTHER));

    // Resolution underway, no second request nor second pending packet.
    assert_eq!(send(&mut eth, &mut nic, &[1, 2, 3], IP_ADDR_OTHER), Ok(Dispatch::Dropped));
    assert!(nic.sent().is_empty());
    let pending: Vec<_> = arp(&eth).pending().iter().collect();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].protocol_addr(), IP_ADDR_OTHER);
    assert_eq!(pending[0].payload(), &PAYLOAD[..]);
}

#[test]
fn reply_drains_pending() {
    let (mut nic, mut eth) = setup();

    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, IP_ADDR_OTHER), Ok(Dispatch::Pending));
    nic.take_sent();

    let reply = arp_frame(ArpOperation::Reply,
        (MAC_ADDR_OTHER, IP_ADDR_OTHER),
        (MAC_ADDR_HOST, IP_ADDR_HOST));
    assert_eq!(eth.receive(&reply, &mut nic), Ok(()));

    let sent = nic.take_sent();
    assert_eq!(sent.len(), 1);
    let frame = ethernet_frame::new_checked(&sent[0]).unwrap();
    assert_eq!(frame.dst_addr(), MAC_ADDR_OTHER);
    assert_eq!(frame.src_addr(), MAC_ADDR_HOST);
    assert_eq!(frame.ethertype(), EthernetProtocol::Ipv4);
    assert_eq!(&frame.payload_slice()[..PAYLOAD.len()], &PAYLOAD[..]);
    assert_eq!(frame.payload_slice().len(), ETHERNET_MIN_PAYLOAD_LEN);

    assert!(arp(&eth).pending().is_empty());
    assert_eq!(arp(&eth).neighbors().lookup(IP_ADDR_OTHER, nic.timestamp()), Some(MAC_ADDR_OTHER));

    // Subsequent sends go out directly.
    nic.set_current_time(Instant::from_secs(59));
    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, IP_ADDR_OTHER), Ok(Dispatch::Sent(MAC_ADDR_OTHER)));
    let sent = nic.take_sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(ethernet_frame::new_checked(&sent[0]).unwrap().ethertype(), EthernetProtocol::Ipv4);
}

#[test]
fn request_for_local_address_is_answered() {
    let (mut nic, mut eth) = setup();

    let request = arp_frame(ArpOperation::Request,
        (MAC_ADDR_THIRD, IP_ADDR_THIRD),
        (EthernetAddress::UNSPECIFIED, IP_ADDR_HOST));
    assert_eq!(eth.receive(&request, &mut nic), Ok(()));

    assert_eq!(arp(&eth).neighbors().lookup(IP_ADDR_THIRD, nic.timestamp()), Some(MAC_ADDR_THIRD));

    let sent = nic.take_sent();
    assert_eq!(sent.len(), 1);
    let (frame, reply) = sent_arp(&sent[0]);
    assert_eq!(frame.dst_addr, MAC_ADDR_THIRD);
    assert_eq!(frame.src_addr, MAC_ADDR_HOST);
    assert_eq!(reply, ArpRepr::EthernetIpv4 {
        operation: ArpOperation::Reply,
        source_hardware_addr: MAC_ADDR_HOST,
        source_protocol_addr: IP_ADDR_HOST,
        target_hardware_addr: MAC_ADDR_THIRD,
        target_protocol_addr: IP_ADDR_THIRD,
    });
}

#[test]
fn request_answered_while_pending() {
    let (mut nic, mut eth) = setup();

    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, IP_ADDR_OTHER), Ok(Dispatch::Pending));
    nic.take_sent();

    // The peer asks for us while we ask for it.
    let request = arp_frame(ArpOperation::Request,
        (MAC_ADDR_OTHER, IP_ADDR_OTHER),
        (EthernetAddress::UNSPECIFIED, IP_ADDR_HOST));
    assert_eq!(eth.receive(&request, &mut nic), Ok(()));

    let sent = nic.take_sent();
    assert_eq!(sent.len(), 2);
    let pending = ethernet_frame::new_checked(&sent[0]).unwrap();
    assert_eq!(pending.ethertype(), EthernetProtocol::Ipv4);
    assert_eq!(pending.dst_addr(), MAC_ADDR_OTHER);
    let (frame, reply) = sent_arp(&sent[1]);
    assert_eq!(frame.dst_addr, MAC_ADDR_OTHER);
    match reply {
        ArpRepr::EthernetIpv4 { operation, target_protocol_addr, .. } => {
            assert_eq!(operation, ArpOperation::Reply);
            assert_eq!(target_protocol_addr, IP_ADDR_OTHER);
        },
    }
    assert!(arp(&eth).pending().is_empty());
}

#[test]
fn request_for_other_address_only_learns() {
    let (mut nic, mut eth) = setup();

    let request = arp_frame(ArpOperation::Request,
        (MAC_ADDR_THIRD, IP_ADDR_THIRD),
        (EthernetAddress::UNSPECIFIED, Ipv4Address::new(10, 0, 0, 9)));
    assert_eq!(eth.receive(&request, &mut nic), Ok(()));

    assert!(nic.sent().is_empty());
    assert_eq!(arp(&eth).neighbors().lookup(IP_ADDR_THIRD, nic.timestamp()), Some(MAC_ADDR_THIRD));
}

#[test]
fn last_learned_wins() {
    let (mut nic, mut eth) = setup();
    let moved = EthernetAddress([0x02, 0, 0, 0, 0, 0xbc]);

    for &(mac, secs) in &[(MAC_ADDR_OTHER, 0), (moved, 1), (MAC_ADDR_OTHER, 2), (moved, 3)] {
        nic.set_current_time(Instant::from_secs(secs));
        let reply = arp_frame(ArpOperation::Reply,
            (mac, IP_ADDR_OTHER),
            (MAC_ADDR_HOST, IP_ADDR_HOST));
        assert_eq!(eth.receive(&reply, &mut nic), Ok(()));
    }

    let neighbors = arp(&eth).neighbors();
    assert_eq!(neighbors.len(), 1);
    assert_eq!(neighbors.lookup(IP_ADDR_OTHER, nic.timestamp()), Some(moved));
    assert!(nic.sent().is_empty());
}

#[test]
fn stale_entry_forces_request() {
    let (mut nic, mut eth) = setup();

    let reply = arp_frame(ArpOperation::Reply,
        (MAC_ADDR_OTHER, IP_ADDR_OTHER),
        (MAC_ADDR_HOST, IP_ADDR_HOST));
    assert_eq!(eth.receive(&reply, &mut nic), Ok(()));

    nic.set_current_time(Instant::from_secs(60));
    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, IP_ADDR_OTHER), Ok(Dispatch::Pending));
    let sent = nic.take_sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent_arp(&sent[0]).1, request_for(IP_ADDR_OTHER));

    // The stale entry is still listed until purged.
    let listed: Vec<_> = arp(&eth).neighbors().iter()
        .map(|neighbor| (neighbor.protocol_addr(), neighbor.hardware_addr()))
        .collect();
    assert_eq!(listed, vec![(IP_ADDR_OTHER, MAC_ADDR_OTHER)]);
}

#[test]
fn request_repeated_after_interval() {
    let (mut nic, mut eth) = setup();

    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, IP_ADDR_OTHER), Ok(Dispatch::Pending));
    nic.set_current_time(Instant::from_millis(999));
    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, IP_ADDR_OTHER), Ok(Dispatch::Dropped));
    nic.set_current_time(Instant::from_millis(1000));
    assert_eq!(send(&mut eth, &mut nic, &[7; 4], IP_ADDR_OTHER), Ok(Dispatch::Pending));

    let sent = nic.take_sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|frame| sent_arp(frame).1 == request_for(IP_ADDR_OTHER)));

    // Only the newest packet is parked.
    let pending: Vec<_> = arp(&eth).pending().iter().collect();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].payload(), &[7; 4][..]);
    assert_eq!(pending[0].queued_at(), Instant::from_millis(1000));
}

#[test]
fn reply_after_interval_finds_nothing_pending() {
    let (mut nic, mut eth) = setup();

    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, IP_ADDR_OTHER), Ok(Dispatch::Pending));
    nic.take_sent();

    nic.set_current_time(Instant::from_secs(2));
    let reply = arp_frame(ArpOperation::Reply,
        (MAC_ADDR_OTHER, IP_ADDR_OTHER),
        (MAC_ADDR_HOST, IP_ADDR_HOST));
    assert_eq!(eth.receive(&reply, &mut nic), Ok(()));

    assert!(nic.sent().is_empty());
    assert!(arp(&eth).pending().is_empty());
    assert_eq!(arp(&eth).neighbors().lookup(IP_ADDR_OTHER, nic.timestamp()), Some(MAC_ADDR_OTHER));
}

#[test]
fn malformed_is_discarded() {
    let (mut nic, mut eth) = setup();

    let valid = arp_frame(ArpOperation::Reply,
        (MAC_ADDR_OTHER, IP_ADDR_OTHER),
        (MAC_ADDR_HOST, IP_ADDR_HOST));

    // Truncated arp packet.
    assert_eq!(eth.receive(&valid[..14 + 27], &mut nic), Ok(()));

    // Not ethernet hardware.
    let mut bad_hardware = valid.clone();
    bad_hardware[15] = 6;
    assert_eq!(eth.receive(&bad_hardware, &mut nic), Ok(()));

    // Not ipv4.
    let mut bad_protocol = valid.clone();
    bad_protocol[16] = 0x86;
    bad_protocol[17] = 0xdd;
    assert_eq!(eth.receive(&bad_protocol, &mut nic), Ok(()));

    // Wrong address length.
    let mut bad_len = valid.clone();
    bad_len[18] = 8;
    assert_eq!(eth.receive(&bad_len, &mut nic), Ok(()));

    // Neither request nor reply.
    let mut bad_operation = valid.clone();
    bad_operation[21] = 3;
    assert_eq!(eth.receive(&bad_operation, &mut nic), Ok(()));

    // Too short for an ethernet header.
    assert_eq!(eth.receive(&[], &mut nic), Err(crate::wire::Error::Truncated));

    assert!(arp(&eth).neighbors().is_empty());
    assert!(nic.sent().is_empty());

    // Sanity check the unmodified packet.
    assert_eq!(eth.receive(&valid, &mut nic), Ok(()));
    assert_eq!(arp(&eth).neighbors().len(), 1);
}

#[test]
fn failed_request_parks_nothing() {
    let (mut nic, mut eth) = setup();

    nic.set_send_capacity(Some(0));
    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, IP_ADDR_OTHER), Err(Error::Exhausted));
    assert!(arp(&eth).pending().is_empty());

    nic.set_send_capacity(None);
    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, IP_ADDR_OTHER), Ok(Dispatch::Pending));
}

#[test]
fn failed_reply_keeps_learned_state() {
    let (mut nic, mut eth) = setup();

    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, IP_ADDR_OTHER), Ok(Dispatch::Pending));
    nic.take_sent();

    // Room for the released packet only, the reply is refused.
    nic.set_send_capacity(Some(1));
    let request = arp_frame(ArpOperation::Request,
        (MAC_ADDR_OTHER, IP_ADDR_OTHER),
        (EthernetAddress::UNSPECIFIED, IP_ADDR_HOST));
    assert_eq!(eth.receive(&request, &mut nic), Ok(()));

    let sent = nic.take_sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(ethernet_frame::new_checked(&sent[0]).unwrap().ethertype(), EthernetProtocol::Ipv4);
    assert!(arp(&eth).pending().is_empty());
    assert_eq!(arp(&eth).neighbors().lookup(IP_ADDR_OTHER, nic.timestamp()), Some(MAC_ADDR_OTHER));
}

#[test]
fn unresolvable_destinations() {
    let (mut nic, mut eth) = setup();

    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, Ipv4Address::new(224, 0, 0, 1)),
               Err(Error::Unreachable));
    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, Ipv4Address::UNSPECIFIED),
               Err(Error::Unreachable));
    assert_eq!(send(&mut eth, &mut nic, &[0; 1501], IP_ADDR_OTHER),
               Err(Error::BadSize));
    assert!(nic.sent().is_empty());
    assert!(arp(&eth).pending().is_empty());

    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, Ipv4Address::BROADCAST),
               Ok(Dispatch::Sent(EthernetAddress::BROADCAST)));
    let sent = nic.take_sent();
    assert_eq!(sent.len(), 1);
    let frame = ethernet_frame::new_checked(&sent[0]).unwrap();
    assert_eq!(frame.dst_addr(), EthernetAddress::BROADCAST);
    assert_eq!(frame.ethertype(), EthernetProtocol::Ipv4);
}

#[test]
fn own_address_is_not_resolved() {
    let (mut nic, mut eth) = setup();

    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, IP_ADDR_HOST), Err(Error::Unreachable));
    assert!(nic.sent().is_empty());
    assert!(arp(&eth).pending().is_empty());

    // Not even once the interval for a repeated request has passed.
    nic.set_current_time(Instant::from_secs(5));
    assert_eq!(send(&mut eth, &mut nic, &PAYLOAD, IP_ADDR_HOST), Err(Error::Unreachable));
    assert!(nic.sent().is_empty());
}

#[test]
fn announce_self() {
    let (mut nic, mut eth) = setup();

    let (resolver, control) = eth.split::<Endpoint>(EthernetProtocol::Arp, &mut nic).unwrap();
    assert_eq!(resolver.request(IP_ADDR_HOST, control), Ok(()));

    let sent = nic.take_sent();
    assert_eq!(sent.len(), 1);
    let (frame, request) = sent_arp(&sent[0]);
    assert_eq!(frame.dst_addr, EthernetAddress::BROADCAST);
    assert_eq!(request, request_for(IP_ADDR_HOST));
    assert!(arp(&eth).pending().is_empty());
}
