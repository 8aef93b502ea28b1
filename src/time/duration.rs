use std::fmt;
use std::ops::{Add, Neg, Sub};

use crate::time::utility::{
    normalize_sec_nsec,
    split_nsec,
    split_sec,
    NSEC_PER_SEC
};

/// Signed span of time. `nsec` is always in `[0, 1e9)`, so a negative
/// duration carries its sign in `sec` (-0.1 s is `{ sec: -1, nsec: 900_000_000 }`).
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Duration {
    sec: i64,
    nsec: u32
}

impl Duration {
    pub const ZERO: Duration = Duration { sec: 0, nsec: 0 };

    pub fn new(sec: i64, nsec: i64) -> Duration {
        let (sec, nsec) = normalize_sec_nsec(sec, nsec);
        Duration { sec, nsec }
    }

    pub fn from_sec(t: f64) -> Duration {
        let (sec, nsec) = split_sec(t);
        Duration { sec, nsec }
    }

    pub fn from_nsec(total_nsec: i128) -> Duration {
        let (sec, nsec) = split_nsec(total_nsec);
        Duration { sec, nsec }
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

    pub fn is_zero(&self) -> bool {
        self.sec == 0 && self.nsec == 0
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sec < 0 && self.nsec > 0 {
            let positive = -*self;
            write!(f, "-{}.{:09}", positive.sec, positive.nsec)
        } else {
            write!(f, "{}.{:09}", self.sec, self.nsec)
        }
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration::from_nsec(self.to_nsec() + rhs.to_nsec())
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        Duration::from_nsec(self.to_nsec() - rhs.to_nsec())
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        Duration::from_nsec(-self.to_nsec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_duration_keeps_nsec_positive() {
        let d = Duration::from_sec(-0.25);
        assert_eq!(d.sec(), -1);
        assert_eq!(d.nsec(), 750_000_000);
        assert_eq!(d.to_string(), "-0.250000000");
        assert_eq!(-d, Duration::from_sec(0.25));
    }

    #[test]
    fn arithmetic_carries_across_seconds() {
        let d = Duration::new(1, 600_000_000) + Duration::new(0, 700_000_000);
        assert_eq!(d, Duration::new(2, 300_000_000));
        assert_eq!(d - d, Duration::ZERO);
    }
}
