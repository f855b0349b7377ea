use std::sync::atomic::{AtomicI64, Ordering};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock instant, stored as UTC seconds since epoch. Mirrors the millisecond-resolution
/// `Time` wrapper used throughout the game server, but at second resolution since the remote
/// game never reports anything finer.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(into = "i64", from = "i64")]
pub struct Time(i64);

impl Time {
    pub const fn from_epoch_seconds(secs: i64) -> Self { Time(secs) }

    pub fn epoch_seconds(self) -> i64 { self.0 }

    pub fn checked_add(self, duration: Duration) -> Self {
        Time(self.0 + duration.num_seconds())
    }

    pub fn checked_sub(self, duration: Duration) -> Self {
        Time(self.0 - duration.num_seconds())
    }

    /// Seconds elapsed from `self` to `other`; negative if `other` precedes `self`.
    pub fn seconds_until(self, other: Time) -> i64 { other.0 - self.0 }
}

impl From<DateTime<Utc>> for Time {
    fn from(time: DateTime<Utc>) -> Self { Time(time.timestamp()) }
}

impl From<Time> for DateTime<Utc> {
    fn from(time: Time) -> Self {
        DateTime::from_utc(chrono::NaiveDateTime::from_timestamp(time.0, 0), Utc)
    }
}

impl From<Time> for i64 {
    fn from(time: Time) -> i64 { time.0 }
}

impl From<i64> for Time {
    fn from(secs: i64) -> Self { Time(secs) }
}

impl std::ops::Add<Duration> for Time {
    type Output = Time;
    fn add(self, rhs: Duration) -> Time { self.checked_add(rhs) }
}

impl std::ops::Sub<Duration> for Time {
    type Output = Time;
    fn sub(self, rhs: Duration) -> Time { self.checked_sub(rhs) }
}

impl std::ops::Sub<Time> for Time {
    type Output = Duration;
    fn sub(self, rhs: Time) -> Duration { Duration::seconds(self.0 - rhs.0) }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", DateTime::<Utc>::from(*self).to_rfc3339())
    }
}

/// Injectable time source. Production code uses [`SystemClock`]; tests substitute
/// [`VirtualClock`] so that scheduler and defence-subsystem logic can be driven deterministically
/// instead of racing the wall clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> Time;
}

#[derive(Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Time { Utc::now().into() }
}

/// A clock that only moves when told to. `advance` is additive so tests can fast-forward through
/// an arbitrary number of scheduler wake-ups without sleeping.
pub struct VirtualClock {
    now: AtomicI64,
}

impl VirtualClock {
    pub fn new(start: Time) -> Self {
        VirtualClock { now: AtomicI64::new(start.epoch_seconds()) }
    }

    pub fn advance(&self, duration: Duration) {
        self.now.fetch_add(duration.num_seconds(), Ordering::SeqCst);
    }

    pub fn set(&self, time: Time) {
        self.now.store(time.epoch_seconds(), Ordering::SeqCst);
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Time { Time::from_epoch_seconds(self.now.load(Ordering::SeqCst)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_ordering_matches_epoch_seconds() {
        let a = Time::from_epoch_seconds(100);
        let b = Time::from_epoch_seconds(200);
        assert!(a < b);
        assert_eq!(b - a, Duration::seconds(100));
    }

    #[test]
    fn test_virtual_clock_advances_on_demand() {
        let clock = VirtualClock::new(Time::from_epoch_seconds(1_000));
        assert_eq!(clock.now().epoch_seconds(), 1_000);
        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now().epoch_seconds(), 1_090);
    }
}
