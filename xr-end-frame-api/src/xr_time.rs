use std::fmt;

/// A point in time in the XR runtime's clock domain, in nanoseconds.
///
/// Matches the representation of `XrTime`: a signed 64-bit nanosecond count
/// whose epoch is defined by the runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct XrTime(i64);

impl XrTime {
    pub const fn from_nanos(nanos: i64) -> XrTime {
        XrTime(nanos)
    }

    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    // Offsets by a frame period, e.g. the runtime's predicted display period.
    pub fn offset_by_nanos(self, nanos: i64) -> XrTime {
        XrTime(self.0.saturating_add(nanos))
    }
}

impl fmt::Display for XrTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

impl From<i64> for XrTime {
    fn from(nanos: i64) -> XrTime {
        XrTime(nanos)
    }
}
