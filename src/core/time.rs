use std::fmt::{Display, Formatter, Result};
use std::ops::{Add, AddAssign, Div, Neg, Sub, SubAssign};

const TICKS_PER_SECOND: f64 = 1e9;
const TICKS_PER_MILLI: i64 = 1_000_000;

/// Signed duration with a fixed resolution of one nanosecond per tick.
///
/// Real-valued conversions round to the nearest tick, so converting a tick
/// count to seconds and back yields the same tick count.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    ticks: i64,
}

impl Time {
    pub const ZERO: Time = Time { ticks: 0 };

    #[inline]
    pub const fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self {
            ticks: millis * TICKS_PER_MILLI,
        }
    }

    #[inline]
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            ticks: (seconds * TICKS_PER_SECOND).round() as i64,
        }
    }

    #[inline]
    pub const fn ticks(self) -> i64 {
        self.ticks
    }

    #[inline]
    pub fn as_seconds(self) -> f64 {
        self.ticks as f64 / TICKS_PER_SECOND
    }

    /// Whole milliseconds, truncated toward zero.
    #[inline]
    pub const fn as_millis(self) -> i64 {
        self.ticks / TICKS_PER_MILLI
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Self {
            ticks: self.ticks.abs(),
        }
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.ticks < 0
    }

    /// Scales by a real-valued gain, going through seconds.
    #[inline]
    pub fn mul_f64(self, gain: f64) -> Self {
        Self::from_seconds(self.as_seconds() * gain)
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Time {
        Time::from_ticks(self.ticks + rhs.ticks)
    }
}

impl AddAssign for Time {
    fn add_assign(&mut self, rhs: Time) {
        self.ticks += rhs.ticks;
    }
}

impl Sub for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Time {
        Time::from_ticks(self.ticks - rhs.ticks)
    }
}

impl SubAssign for Time {
    fn sub_assign(&mut self, rhs: Time) {
        self.ticks -= rhs.ticks;
    }
}

impl Neg for Time {
    type Output = Time;

    fn neg(self) -> Time {
        Time::from_ticks(-self.ticks)
    }
}

impl Div<i64> for Time {
    type Output = Time;

    fn div(self, rhs: i64) -> Time {
        Time::from_ticks(self.ticks / rhs)
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{:.9}s", self.as_seconds())
    }
}
