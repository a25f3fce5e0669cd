//! Process identifier type.
//!
//! A `ProcessId` is accepted only when the argument consists entirely of
//! ASCII decimal digits. The text is kept exactly as given so that paths
//! under the process table are built from the caller's spelling.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Validated process identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessId(String);

impl ProcessId {
    /// Parse a process identifier, rejecting anything that is not purely decimal.
    ///
    /// No sign, no whitespace, and no empty string.
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Usage(format!(
                "invalid pid '{s}': must contain only decimal digits"
            )));
        }
        Ok(ProcessId(s.to_string()))
    }

    /// The identifier exactly as it was given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, if it fits in 32 bits.
    pub fn as_u32(&self) -> Option<u32> {
        self.0.parse().ok()
    }
}

impl FromStr for ProcessId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProcessId::parse(s)
    }
}

impl From<u32> for ProcessId {
    fn from(pid: u32) -> Self {
        ProcessId(pid.to_string())
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialized as a number when the spelling is canonical, otherwise as the
/// original string (`"007"`, oversized values).
impl Serialize for ProcessId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_u32() {
            Some(n) if n.to_string() == self.0 => serializer.serialize_u32(n),
            _ => serializer.serialize_str(&self.0),
        }
    }
}
