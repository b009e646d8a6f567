//! Route identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid route number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route number: {reason}")]
pub struct InvalidRouteId {
    reason: &'static str,
}

/// A bus route number such as `12`, `21g` or `m1`.
///
/// Route numbers come from the dataset in mixed case and with stray
/// whitespace; this type trims and lower-cases on construction so that
/// two spellings of the same route always compare equal. A `RouteId` is
/// never empty.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouteId(String);

impl RouteId {
    /// Parse a route number from a string.
    ///
    /// Trims whitespace and lower-cases; rejects empty input.
    pub fn parse(s: &str) -> Result<Self, InvalidRouteId> {
        let normalized = s.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(InvalidRouteId {
                reason: "must not be empty",
            });
        }
        Ok(RouteId(normalized))
    }

    /// Returns the normalized route number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RouteId {
    type Error = InvalidRouteId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        RouteId::parse(&s)
    }
}

impl From<RouteId> for String {
    fn from(id: RouteId) -> String {
        id.0
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        assert_eq!(RouteId::parse("12").unwrap().as_str(), "12");
        assert_eq!(RouteId::parse(" 21G ").unwrap().as_str(), "21g");
        assert_eq!(RouteId::parse("M1").unwrap().as_str(), "m1");
    }

    #[test]
    fn reject_empty() {
        assert!(RouteId::parse("").is_err());
        assert!(RouteId::parse("   ").is_err());
    }

    #[test]
    fn equality_is_case_insensitive() {
        assert_eq!(RouteId::parse("21G").unwrap(), RouteId::parse("21g").unwrap());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", RouteId::parse("12").unwrap()), "12");
    }
}
