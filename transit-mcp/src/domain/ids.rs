//! Opaque upstream identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid stop or route identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier {value:?}: {reason}")]
pub struct InvalidId {
    value: String,
    reason: &'static str,
}

/// Identifiers are interpolated into URL paths, so anything that would
/// change the path or start a query/fragment is rejected.
fn validate(s: &str) -> Result<(), InvalidId> {
    let reject = |reason| {
        Err(InvalidId {
            value: s.to_string(),
            reason,
        })
    };

    if s.is_empty() {
        return reject("must not be empty");
    }
    if s.chars().any(char::is_whitespace) {
        return reject("must not contain whitespace");
    }
    if s.contains(['/', '?', '#']) {
        return reject("must not contain '/', '?' or '#'");
    }
    Ok(())
}

/// Identifier of a stop, as issued by the transit API (e.g. `1_75403`).
///
/// The value is opaque: the only guarantee is that it is safe to place in a
/// request path.
///
/// # Examples
///
/// ```
/// use transit_mcp::domain::StopId;
///
/// let stop = StopId::parse("1_75403").unwrap();
/// assert_eq!(stop.as_str(), "1_75403");
///
/// assert!(StopId::parse("").is_err());
/// assert!(StopId::parse("1/2").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopId(String);

impl StopId {
    /// Parse a stop identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        validate(s)?;
        Ok(StopId(s.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StopId {
    type Error = InvalidId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        validate(&s)?;
        Ok(StopId(s))
    }
}

impl From<StopId> for String {
    fn from(id: StopId) -> Self {
        id.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a route (e.g. `1_100224`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouteId(String);

impl RouteId {
    /// Parse a route identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        validate(s)?;
        Ok(RouteId(s.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RouteId {
    type Error = InvalidId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        validate(&s)?;
        Ok(RouteId(s))
    }
}

impl From<RouteId> for String {
    fn from(id: RouteId) -> Self {
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
