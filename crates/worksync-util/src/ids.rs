//! Strongly-typed identifiers for worksync

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Employee code, as typed on the login form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EmployeeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EmployeeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for an attendance record.
///
/// Freshly issued records carry a UUID; seeded records use a
/// deterministic `seed-<employee>-<date>` form, so this stays a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, unique record ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_id_equality() {
        let id1 = EmployeeId::new("2001");
        let id2 = EmployeeId::new("2001");
        let id3 = EmployeeId::new("2002");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn record_id_uniqueness() {
        let r1 = RecordId::generate();
        let r2 = RecordId::generate();
        assert_ne!(r1, r2);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let employee_id = EmployeeId::new("1001");
        let json = serde_json::to_string(&employee_id).unwrap();
        assert_eq!(json, "\"1001\"");
        let parsed: EmployeeId = serde_json::from_str(&json).unwrap();
        assert_eq!(employee_id, parsed);

        let record_id = RecordId::new("seed-1001-2025-01-02");
        let json = serde_json::to_string(&record_id).unwrap();
        let parsed: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(record_id, parsed);
    }
}
