//! Station identifier type.

use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id {input:?}: {reason}")]
pub struct InvalidStationId {
    input: String,
    reason: &'static str,
}

/// Opaque identifier of a station within one loaded network.
///
/// Identifiers are only compared for equality and hashed. They carry no
/// ordering: two ids that look numerically adjacent say nothing about
/// the stations they name.
///
/// # Examples
///
/// ```
/// use metro_fare::domain::StationId;
///
/// let id = StationId::parse("123").unwrap();
/// assert_eq!(id.to_string(), "123");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("abc").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StationId(u32);

impl StationId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u32) -> Self {
        StationId(raw)
    }

    /// Parse an identifier from its textual form.
    ///
    /// The input must be a non-empty run of ASCII digits that fits in 32 bits.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                input: s.to_string(),
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStationId {
                input: s.to_string(),
                reason: "must be ASCII digits",
            });
        }

        s.parse::<u32>().map(StationId).map_err(|_| InvalidStationId {
            input: s.to_string(),
            reason: "out of range",
        })
    }

    /// Returns the raw identifier.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl FromStr for StationId {
    type Err = InvalidStationId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StationId::parse(s)
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert_eq!(StationId::parse("0").unwrap().get(), 0);
        assert_eq!(StationId::parse("123").unwrap().get(), 123);
        assert_eq!(StationId::parse("007").unwrap().get(), 7);
        assert_eq!(StationId::parse("4294967295").unwrap().get(), u32::MAX);
    }

    #[test]
    fn reject_empty() {
        assert!(StationId::parse("").is_err());
    }

    #[test]
    fn reject_non_digits() {
        assert!(StationId::parse("abc").is_err());
        assert!(StationId::parse("-1").is_err());
        assert!(StationId::parse("+1").is_err());
        assert!(StationId::parse(" 12").is_err());
        assert!(StationId::parse("1.5").is_err());
    }

    #[test]
    fn reject_out_of_range() {
        let err = StationId::parse("4294967296").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid station id \"4294967296\": out of range"
        );
    }

    #[test]
    fn from_str_matches_parse() {
        let id: StationId = "42".parse().unwrap();
        assert_eq!(id, StationId::new(42));
    }

    #[test]
    fn display_and_debug() {
        let id = StationId::new(815);
        assert_eq!(format!("{}", id), "815");
        assert_eq!(format!("{:?}", id), "StationId(815)");
    }

    #[test]
    fn hash_consistent_with_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(StationId::parse("12").unwrap());
        assert!(set.contains(&StationId::new(12)));
        assert!(!set.contains(&StationId::new(21)));
    }
}
