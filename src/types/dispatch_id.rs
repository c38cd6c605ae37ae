//! Dispatch identifier type using TypeID format.
//!
//! Every call to `Controller::act` is tagged with a `DispatchId` so that log
//! lines and fatal errors from one decision step can be tied together.
//! Format: `act_01h455vb4pex5vsknk084sn02q`

use mti::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identifier for a single dispatch through the controller.
///
/// Uses TypeID format, so ids sort by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DispatchId(MagicTypeId);

/// Error returned when a string is not a valid dispatch id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidDispatchId {
    /// TypeID parsing failed
    Parse(String),
    /// Wrong prefix (expected "act")
    WrongPrefix {
        /// The expected prefix
        expected: &'static str,
        /// The actual prefix found
        actual: String,
    },
}

impl fmt::Display for InvalidDispatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "invalid dispatch ID: {e}"),
            Self::WrongPrefix { expected, actual } => {
                write!(f, "expected prefix '{expected}', got '{actual}'")
            }
        }
    }
}

impl std::error::Error for InvalidDispatchId {}

impl DispatchId {
    /// The TypeID prefix for dispatch identifiers.
    pub const PREFIX: &'static str = "act";

    /// Creates a new dispatch id with a fresh UUIDv7.
    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }

    /// Parses a dispatch id, validating the prefix.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDispatchId::Parse` if the string is not a valid TypeID.
    /// Returns `InvalidDispatchId::WrongPrefix` if the prefix is not `act`.
    pub fn parse(s: &str) -> Result<Self, InvalidDispatchId> {
        let id = MagicTypeId::from_str(s).map_err(|e| InvalidDispatchId::Parse(e.to_string()))?;

        let prefix = id.prefix().as_str();
        if prefix != Self::PREFIX {
            return Err(InvalidDispatchId::WrongPrefix {
                expected: Self::PREFIX,
                actual: prefix.to_string(),
            });
        }

        Ok(Self(id))
    }
}

impl Default for DispatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DispatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DispatchId {
    type Err = InvalidDispatchId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DispatchId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DispatchId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
