//! Points in time as reported by a device.
//!
//! Nothing in `arpox` reads a clock on its own. A [`Device`] reports the [`Instant`] at which it
//! currently operates and every lifetime check in the neighbor cache and the pending buffer is
//! made against that value. Tests and simulations advance it by hand.
//!
//! [`Device`]: ../nic/trait.Device.html
//! [`Instant`]: struct.Instant.html
use core::convert::TryFrom;
use core::{fmt, ops};
pub use core::time::Duration;

/// A timestamp with millisecond resolution.
///
/// Counted from an arbitrary origin chosen by the device, such as its start. Only differences
/// and the order of two instants carry meaning. Negative values lie before the origin.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Instant {
    millis: i64,
}

impl Instant {
    /// The origin of the device clock.
    pub const ZERO: Instant = Instant { millis: 0 };

    /// An instant `millis` milliseconds after the origin.
    pub fn from_millis<T: Into<i64>>(millis: T) -> Instant {
        Instant { millis: millis.into() }
    }

    /// An instant `secs` whole seconds after the origin.
    pub fn from_secs<T: Into<i64>>(secs: T) -> Instant {
        Instant { millis: secs.into().saturating_mul(1000) }
    }

    /// Milliseconds since the origin.
    pub fn total_millis(self) -> i64 {
        self.millis
    }
}

fn duration_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(feature = "std")]
impl From<std::time::SystemTime> for Instant {
    fn from(time: std::time::SystemTime) -> Instant {
        match time.duration_since(std::time::UNIX_EPOCH) {
            Ok(after) => Instant::ZERO + after,
            Err(before) => Instant::ZERO - before.duration(),
        }
    }
}

#[cfg(feature = "std")]
impl From<Instant> for std::time::SystemTime {
    fn from(instant: Instant) -> std::time::SystemTime {
        let offset = Duration::from_millis(instant.millis.unsigned_abs());
        if instant.millis < 0 {
            std::time::UNIX_EPOCH - offset
        } else {
            std::time::UNIX_EPOCH + offset
        }
    }
}

/// Seconds with three decimals, as in the arp table dump.
impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.millis < 0 { "-" } else { "" };
        let abs = self.millis.unsigned_abs();
        write!(f, "{}{}.{:03}s", sign, abs / 1000, abs % 1000)
    }
}

impl ops::Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        Instant { millis: self.millis.saturating_add(duration_millis(rhs)) }
    }
}

impl ops::AddAssign<Duration> for Instant {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl ops::Sub<Duration> for Instant {
    type Output = Instant;

    fn sub(self, rhs: Duration) -> Instant {
        Instant { millis: self.millis.saturating_sub(duration_millis(rhs)) }
    }
}
