use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON object carried by a mutation or cached record: the full record for a
/// create, `{id, ...partial}` for an update, `{id}` for a delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payload(Value);

impl Payload {
    pub fn new(value: Value) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| format!("Invalid JSON payload: {e}"))?;
        Self::new(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }

    /// String value of a top-level field, if present.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Field-wise overwrite of `self` with every top-level field of `partial`.
    pub fn merged_with(&self, partial: &Payload) -> Payload {
        let mut out = self.0.clone();
        if let (Some(base), Some(fields)) = (out.as_object_mut(), partial.0.as_object()) {
            for (key, value) in fields {
                base.insert(key.clone(), value.clone());
            }
        }
        Payload(out)
    }

    /// Copy of the payload with `key` set to the given string value.
    pub fn with_field(&self, key: &str, value: &str) -> Payload {
        let mut out = self.0.clone();
        if let Some(map) = out.as_object_mut() {
            map.insert(key.to_string(), Value::String(value.to_string()));
        }
        Payload(out)
    }

    fn validate(value: &Value) -> Result<(), String> {
        if !value.is_object() {
            return Err("Payload must be a JSON object".to_string());
        }
        Ok(())
    }
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        payload.0
    }
}
