use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use chrono::{DateTime, Utc};

use crate::time::duration::Duration;
use crate::time::utility::{
    normalize_sec_nsec,
    split_nsec,
    split_sec,
    NSEC_PER_SEC
};

/// Timestamp as whole seconds plus nanoseconds, normalized so that `nsec`
/// stays in `[0, 1e9)`. Field order makes the derived ordering chronological.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Time {
    sec: i64,
    nsec: u32
}

impl Time {
    pub const ZERO: Time = Time { sec: 0, nsec: 0 };

    pub fn new(sec: i64, nsec: i64) -> Time {
        let (sec, nsec) = normalize_sec_nsec(sec, nsec);
        Time { sec, nsec }
    }

    pub fn from_sec(t: f64) -> Time {
        let (sec, nsec) = split_sec(t);
        Time { sec, nsec }
    }

    pub fn from_nsec(total_nsec: i128) -> Time {
        let (sec, nsec) = split_nsec(total_nsec);
        Time { sec, nsec }
    }

    pub fn from_datetime(datetime: &DateTime<Utc>) -> Time {
        Time::new(datetime.timestamp(), datetime.timestamp_subsec_nanos() as i64)
    }

    pub fn sec(&self) -> i64 {
        self.sec
    }

    pub fn nsec(&self) -> u32 {
        self.nsec
    }

    pub fn to_sec(&self) -> f64 {
        self.sec as f64 + 1e-9 * self.nsec as f64
    }

    pub fn to_nsec(&self) -> i128 {
        self.sec as i128 * NSEC_PER_SEC as i128 + self.nsec as i128
    }

    /// `None` when the timestamp is outside chrono's representable range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sec, self.nsec)
    }

    pub fn is_zero(&self) -> bool {
        self.sec == 0 && self.nsec == 0
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.sec, self.nsec)
    }
}

impl Sub for Time {
    type Output = Duration;

    fn sub(self, rhs: Time) -> Duration {
        Duration::from_nsec(self.to_nsec() - rhs.to_nsec())
    }
}

impl Add<Duration> for Time {
    type Output = Time;

    fn add(self, rhs: Duration) -> Time {
        Time::from_nsec(self.to_nsec() + rhs.to_nsec())
    }
}

impl Sub<Duration> for Time {
    type Output = Time;

    fn sub(self, rhs: Duration) -> Time {
        Time::from_nsec(self.to_nsec() - rhs.to_nsec())
    }
}

impl AddAssign<Duration> for Time {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl SubAssign<Duration> for Time {
    fn sub_assign(&mut self, rhs: Duration) {
        *self = *self - rhs;
    }
}
