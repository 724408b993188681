use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix marking a record id as locally originated. Such ids are generated
/// client-side while offline and stay canonical after the create replays;
/// the remote insert is keyed by them, so no id rewrite happens later.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Identifier of a tracked record, remote- or locally-assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: String) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    /// Mint an id for a record created while offline.
    pub fn generate_local() -> Self {
        Self(format!("{LOCAL_ID_PREFIX}{}", Uuid::new_v4()))
    }

    pub fn is_local(&self) -> bool {
        self.0.starts_with(LOCAL_ID_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err("Record ID cannot be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}
