//! QR payload wire format.
//!
//! A payload is a compact JSON object, `{"sessionId":12345,"totp":"123456"}`.
//! The field names are read by the verifying side and must not change.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub session_id: i64,
    pub totp: String,
}

impl Payload {
    pub fn new(session_id: i64, totp: impl Into<String>) -> Self {
        Self {
            session_id,
            totp: totp.into(),
        }
    }

    pub fn encode(&self) -> String {
        // Plain fields with string keys; serialization cannot fail.
        let Ok(encoded) = serde_json::to_string(self) else {
            unreachable!("payload fields always serialize");
        };
        encoded
    }
}

/// Outcome of reading a scanned payload.
///
/// Anything that is not a well-formed payload is kept verbatim so the caller
/// can still show or log it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPayload {
    Structured(Payload),
    Unstructured { raw: String, reason: String },
}

impl ParsedPayload {
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            ParsedPayload::Structured(payload) => Some(payload),
            ParsedPayload::Unstructured { .. } => None,
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, ParsedPayload::Structured(_))
    }
}

pub fn parse(raw: &str) -> ParsedPayload {
    let unstructured = |reason: String| ParsedPayload::Unstructured {
        raw: raw.to_string(),
        reason,
    };

    let value: Value = match serde_json::from_str(raw.trim()) {
        Ok(value) => value,
        Err(e) => return unstructured(format!("not JSON: {e}")),
    };
    let Value::Object(fields) = value else {
        return unstructured("not a JSON object".to_string());
    };

    let payload: Payload = match serde_json::from_value(Value::Object(fields)) {
        Ok(payload) => payload,
        Err(e) => return unstructured(format!("not a session payload: {e}")),
    };
    if payload.totp.is_empty() || !payload.totp.chars().all(|c| c.is_ascii_digit()) {
        return unstructured("`totp` is not a decimal code".to_string());
    }

    ParsedPayload::Structured(payload)
}
