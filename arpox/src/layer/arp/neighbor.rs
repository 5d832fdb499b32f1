// Heads up! Before working on this file you should read, at least,
// the parts of RFC 1122 that discuss ARP.
use alloc::collections::BTreeMap;
use core::fmt;

use crate::time::{Duration, Instant};
use crate::wire::{EthernetAddress, Ipv4Address};

/// A cached neighbor.
///
/// A neighbor mapping translates from a protocol address to a hardware address, and contains the
/// timestamp of its last update. Together with the lifetime configured in its cache this
/// determines when the mapping should be considered invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Neighbor {
    protocol_addr: Ipv4Address,
    hardware_addr: EthernetAddress,
    updated_at:    Instant,
}

/// A neighbor cache backed by an ordered map.
///
/// Holds at most one mapping per protocol address, the last learned one wins. Mappings are never
/// served after their lifetime has passed but they are only removed from memory by [`purge`].
///
/// # Examples
///
/// ```rust
/// use arpox::layer::arp::NeighborCache;
/// use arpox::time::{Duration, Instant};
/// use arpox::wire::{EthernetAddress, Ipv4Address};
///
/// let mut cache = NeighborCache::new(Duration::from_secs(60));
/// let ip = Ipv4Address::new(10, 0, 0, 2);
/// let mac = EthernetAddress([0x02, 0, 0, 0, 0, 2]);
///
/// cache.fill(ip, mac, Instant::from_secs(0));
/// assert_eq!(cache.lookup(ip, Instant::from_secs(59)), Some(mac));
/// assert_eq!(cache.lookup(ip, Instant::from_secs(60)), None);
/// ```
///
/// [`purge`]: #method.purge
#[derive(Debug, Clone)]
pub struct Cache {
    storage:  BTreeMap<Ipv4Address, Neighbor>,
    lifetime: Duration,
}

impl Cache {
    /// Create an empty cache whose entries are valid for `lifetime` after their last update.
    pub fn new(lifetime: Duration) -> Self {
        Cache {
            storage: BTreeMap::new(),
            lifetime,
        }
    }

    /// Add or refresh a mapping.
    ///
    /// Any previous mapping of the protocol address is replaced.
    pub fn fill(
        &mut self,
        protocol_addr: Ipv4Address,
        hardware_addr: EthernetAddress,
        timestamp: Instant,
    ) {
        let neighbor = Neighbor {
            protocol_addr,
            hardware_addr,
            updated_at: timestamp,
        };

        if let Some(old) = self.storage.insert(protocol_addr, neighbor) {
            if old.hardware_addr != hardware_addr {
                net_debug!("arp: {} moved from {} to {}", protocol_addr, old.hardware_addr, hardware_addr);
            }
        }
    }

    /// Find the hardware address of a neighbor.
    ///
    /// The broadcast protocol address always maps to the broadcast hardware address, without any
    /// entry. Returns `None` if there is no mapping or it has expired.
    pub fn lookup(
        &self,
        protocol_addr: Ipv4Address,
        timestamp: Instant,
    ) -> Option<EthernetAddress> {
        if protocol_addr.is_broadcast() {
            return Some(EthernetAddress::BROADCAST);
        }

        self.storage.get(&protocol_addr)
            .filter(|neighbor| neighbor.is_alive(timestamp, self.lifetime))
            .map(|neighbor| neighbor.hardware_addr)
    }

    /// Remove all expired mappings.
    ///
    /// Returns the number of removed entries.
    pub fn purge(&mut self, timestamp: Instant) -> usize {
        let lifetime = self.lifetime;
        let before = self.storage.len();
        self.storage.retain(|_, neighbor| neighbor.is_alive(timestamp, lifetime));
        before - self.storage.len()
    }

    /// Iterate over all entries by ascending protocol address.
    ///
    /// This includes expired entries that have not yet been purged.
    pub fn iter(&self) -> impl Iterator<Item=&Neighbor> + '_ {
        self.storage.values()
    }

    /// The number of entries, including expired ones that have not yet been purged.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// If there are no entries at all.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Neighbor {
    /// The protocol address of the neighbor.
    pub fn protocol_addr(&self) -> Ipv4Address {
        self.protocol_addr
    }

    /// The hardware address last learned for the neighbor.
    pub fn hardware_addr(&self) -> EthernetAddress {
        self.hardware_addr
    }

    /// The time of the last update.
    pub fn updated_at(&self) -> Instant {
        self.updated_at
    }

    /// If the mapping is still valid at `ts` given the lifetime of entries.
    pub fn is_alive(&self, ts: Instant, lifetime: Duration) -> bool {
        ts < self.updated_at + lifetime
    }
}

impl fmt::Display for Neighbor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} | {} | {}", self.protocol_addr, self.hardware_addr, self.updated_at)
    }
}

/// The diagnostic dump of the whole table.
impl fmt::Display for Cache {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "===ARP TABLE BEGIN===")?;
        for neighbor in self.iter() {
            writeln!(f, "{}", neighbor)?;
        }
        writeln!(f, "===ARP TABLE  END ===")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const IP_ADDR_1: Ipv4Address = Ipv4Address::new(10, 0, 0, 1);
    const IP_ADDR_2: Ipv4Address = Ipv4Address::new(10, 0, 0, 2);
    const IP_ADDR_3: Ipv4Address = Ipv4Address::new(10, 0, 0, 3);

    const HADDR_A: EthernetAddress = EthernetAddress([0, 0, 0, 0, 0, 1]);
    const HADDR_B: EthernetAddress = EthernetAddress([0, 0, 0, 0, 0, 2]);

    const LIFETIME: Duration = Duration::from_secs(60);

    #[test]
    fn fill() {
        let mut cache = Cache::new(LIFETIME);

        assert_eq!(cache.lookup(IP_ADDR_1, Instant::from_millis(0)), None);
        assert_eq!(cache.lookup(IP_ADDR_2, Instant::from_millis(0)), None);

        cache.fill(IP_ADDR_1, HADDR_A, Instant::from_millis(0));
        assert_eq!(cache.lookup(IP_ADDR_1, Instant::from_millis(0)), Some(HADDR_A));
        assert_eq!(cache.lookup(IP_ADDR_2, Instant::from_millis(0)), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expire() {
        let mut cache = Cache::new(LIFETIME);

        cache.fill(IP_ADDR_1, HADDR_A, Instant::from_millis(0));
        assert_eq!(cache.lookup(IP_ADDR_1, Instant::from_millis(59_999)), Some(HADDR_A));
        // Stale exactly at the end of the lifetime.
        assert_eq!(cache.lookup(IP_ADDR_1, Instant::from_millis(60_000)), None);
        assert_eq!(cache.lookup(IP_ADDR_1, Instant::from_millis(0) + LIFETIME * 2), None);
        // But still in memory.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn replace() {
        let mut cache = Cache::new(LIFETIME);

        cache.fill(IP_ADDR_1, HADDR_A, Instant::from_millis(0));
        assert_eq!(cache.lookup(IP_ADDR_1, Instant::from_millis(0)), Some(HADDR_A));
        cache.fill(IP_ADDR_1, HADDR_B, Instant::from_millis(30_000));
        assert_eq!(cache.lookup(IP_ADDR_1, Instant::from_millis(30_000)), Some(HADDR_B));
        // The refresh extends the lifetime.
        assert_eq!(cache.lookup(IP_ADDR_1, Instant::from_millis(89_999)), Some(HADDR_B));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn broadcast() {
        let cache = Cache::new(LIFETIME);
        assert_eq!(cache.lookup(Ipv4Address::BROADCAST, Instant::from_millis(0)),
                   Some(EthernetAddress::BROADCAST));
    }

    #[test]
    fn purge() {
        let mut cache = Cache::new(LIFETIME);

        cache.fill(IP_ADDR_1, HADDR_A, Instant::from_secs(0));
        cache.fill(IP_ADDR_2, HADDR_B, Instant::from_secs(30));
        assert_eq!(cache.purge(Instant::from_secs(59)), 0);
        assert_eq!(cache.purge(Instant::from_secs(60)), 1);
        assert_eq!(cache.lookup(IP_ADDR_2, Instant::from_secs(60)), Some(HADDR_B));
        assert_eq!(cache.purge(Instant::from_secs(90)), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn ordered_iteration() {
        let mut cache = Cache::new(LIFETIME);

        cache.fill(IP_ADDR_3, HADDR_A, Instant::from_secs(1));
        cache.fill(IP_ADDR_1, HADDR_B, Instant::from_secs(2));
        let addrs: Vec<_> = cache.iter().map(Neighbor::protocol_addr).collect();
        assert_eq!(addrs, vec![IP_ADDR_1, IP_ADDR_3]);
    }

    #[test]
    fn dump() {
        let mut cache = Cache::new(LIFETIME);
        assert_eq!(format!("{}", cache), "===ARP TABLE BEGIN===\n===ARP TABLE  END ===\n");

        cache.fill(IP_ADDR_2, HADDR_B, Instant::from_millis(1_500));
        cache.fill(IP_ADDR_1, HADDR_A, Instant::from_millis(250));
        assert_eq!(format!("{}", cache), "\
===ARP TABLE BEGIN===
10.0.0.1 | 00-00-00-00-00-01 | 0.250s
10.0.0.2 | 00-00-00-00-00-02 | 1.500s
===ARP TABLE  END ===
");
    }
}
