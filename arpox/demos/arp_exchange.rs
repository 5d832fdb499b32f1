//! Resolves a peer on a simulated link and prints the resulting arp tables.
//!
//! # Usage
//!
//! Two interfaces are connected through in-memory devices, frames are moved between them after
//! each poll. The first host sends a number of packets towards the second one, one every
//! `--gap` milliseconds of simulated time, starting with an empty neighbor cache.
//!
//!   > $ cargo run --example arp_exchange -- 10.0.0.1 02:00:00:00:00:01 10.0.0.2 02:00:00:00:00:02
//!
//! Both hosts announce themselves when they come up, which already teaches each the address of
//! the other. Pass `--quiet` to lose these announcements.
//!
//! With `--lifetime` shorter than the total simulated time the mapping expires in between and the
//! peer is resolved again.
use structopt::StructOpt;

use arpox::iface::Interface;
use arpox::layer::arp;
use arpox::nic::External;
use arpox::time::{Duration, Instant};
use arpox::wire::{EthernetAddress, Ipv4Address};

#[derive(StructOpt)]
struct Config {
    host: Ipv4Address,

    hostmac: EthernetAddress,

    peer: Ipv4Address,

    peermac: EthernetAddress,

    /// Number of packets to send from host to peer.
    #[structopt(short, long, default_value = "4")]
    count: usize,

    /// Simulated milliseconds between two packets.
    #[structopt(short, long, default_value = "500")]
    gap: u64,

    /// Seconds a learned mapping is valid.
    #[structopt(long, default_value = "60")]
    lifetime: u64,

    /// Milliseconds before an unanswered request may be repeated.
    #[structopt(long, default_value = "1000")]
    interval: u64,

    /// Log the processing of frames, repeat for more detail.
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    /// Lose the startup announcements so that the host has to ask for the peer.
    #[structopt(long)]
    quiet: bool,
}

fn main() {
    let Config {
        host,
        hostmac,
        peer,
        peermac,
        count,
        gap,
        lifetime,
        interval,
        verbose,
        quiet,
    } = Config::from_args();

    setup_logging(match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    });

    let config = arp::Config {
        entry_lifetime: Duration::from_secs(lifetime),
        request_interval: Duration::from_millis(interval),
    };

    let mut a = Interface::new(External::new(), hostmac, host, config)
        .expect("Couldn't bring up host");
    let mut b = Interface::new(External::new(), peermac, peer, config)
        .expect("Couldn't bring up peer");

    if quiet {
        a.device_mut().take_sent();
        b.device_mut().take_sent();
    }

    let mut now = Instant::from_millis(0);
    for seq in 0..count {
        let payload = format!("packet {}", seq).into_bytes();
        match a.resolve_and_send(payload, peer) {
            Ok(dispatch) => println!("[{}] packet {}: {:?}", now, seq, dispatch),
            Err(err) => println!("[{}] packet {}: {}", now, seq, err),
        }

        // Let the link settle, each round trip takes one exchange in each direction.
        while exchange(&mut a, &mut b) + exchange(&mut b, &mut a) > 0 {}

        now += Duration::from_millis(gap);
        a.device_mut().set_current_time(now);
        b.device_mut().set_current_time(now);
    }

    println!("host {} at {}", host, hostmac);
    a.print_cache();
    println!("peer {} at {}", peer, peermac);
    b.print_cache();
}

/// Deliver everything `from` has sent to `to` and let it process the frames.
fn exchange(from: &mut Interface<External>, to: &mut Interface<External>) -> usize {
    for frame in from.device_mut().take_sent() {
        to.device_mut().push_received(frame);
    }

    to.poll(usize::MAX)
}

fn setup_logging(level: log::LevelFilter) {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .filter(None, level)
        .init();
}
