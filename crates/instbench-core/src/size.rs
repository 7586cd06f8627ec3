//! Item-count and rate value types.
//!
//! Every variant driver converts between operation counts, byte counts, and
//! per-second rates. These types keep that arithmetic in one place so the
//! call sites never duplicate scale factors.

use std::time::Duration;

/// A count of abstract benchmark items (operations or elements).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Size(u64);

impl Size {
    /// Creates a size from an item count.
    #[must_use]
    pub const fn new(items: u64) -> Self {
        Size(items)
    }

    /// Returns the raw item count.
    #[must_use]
    pub const fn items(self) -> u64 {
        self.0
    }

    /// Returns the byte count for elements of type `T`.
    #[must_use]
    pub const fn to_bytes<T>(self) -> u64 {
        self.0 * std::mem::size_of::<T>() as u64
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} items", self.0)
    }
}

/// A rate of items per second, derived from a [`Size`] and a duration.
///
/// Scaled views (`tera`, `giga`) are display transforms only; the raw
/// per-second rate is the sole stored state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    per_second: f64,
}

impl Throughput {
    /// Computes the rate for `size` items processed in `duration`.
    #[must_use]
    pub fn new(size: Size, duration: Duration) -> Self {
        Throughput {
            per_second: size.items() as f64 / duration.as_secs_f64(),
        }
    }

    /// Computes a byte rate for `bytes` moved in `duration`.
    #[must_use]
    pub fn from_bytes(bytes: u64, duration: Duration) -> Self {
        Self::new(Size::new(bytes), duration)
    }

    /// Returns the raw rate in items per second.
    #[must_use]
    pub fn per_second(self) -> f64 {
        self.per_second
    }

    /// Returns the rate scaled to tera-items (1e12) per second.
    #[must_use]
    pub fn tera(self) -> f64 {
        self.per_second / 1e12
    }

    /// Returns the rate scaled to giga-items (1e9) per second.
    #[must_use]
    pub fn giga(self) -> f64 {
        self.per_second / 1e9
    }
}
