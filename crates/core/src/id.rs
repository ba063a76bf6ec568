//! Strongly-typed identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GateError;

/// Identifier of a content resource (page, product, ...).
///
/// Resource ids are positive integers assigned by the host content store.
/// Zero is the host's "no resource" sentinel and is never a valid id, which
/// is why construction goes through [`ResourceId::new`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(u64);

impl ResourceId {
    /// Returns `None` for the zero sentinel.
    pub fn new(raw: u64) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Raw value of an optional id, with `None` mapped back to `0`.
    pub fn raw_or_zero(id: Option<Self>) -> u64 {
        id.map(Self::get).unwrap_or(0)
    }
}

impl core::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ResourceId {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<u64>()
            .map_err(|e| GateError::invalid_id(format!("ResourceId: {e}")))?;
        Self::new(raw).ok_or_else(|| GateError::invalid_id("ResourceId: zero is not a resource"))
    }
}

/// Identifier of a site user (the editor behind a session).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for UserId {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s).map_err(|e| GateError::invalid_id(format!("UserId: {e}")))?;
        Ok(Self(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_a_resource() {
        assert!(ResourceId::new(0).is_none());
        assert!("0".parse::<ResourceId>().is_err());
        assert_eq!(ResourceId::raw_or_zero(None), 0);
    }

    #[test]
    fn parses_trimmed_numeric_ids() {
        let id: ResourceId = " 42 ".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_garbage() {
        let err = "abc".parse::<ResourceId>().unwrap_err();
        assert!(matches!(err, GateError::InvalidId(_)));
    }
}
