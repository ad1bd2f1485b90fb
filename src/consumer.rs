//! Scanner-side check-in.
//!
//! A scanned string is parsed, the holder is asked to authenticate, and on
//! success the device identifier is attached. Authentication and device
//! identity are supplied by the platform through the two traits below.

use crate::payload::{self, ParsedPayload, Payload};

pub const PROMPT_TITLE: &str = "Verify identity";
pub const PROMPT_SUBTITLE: &str = "Confirm it is you to check in";

/// Result of an authentication prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    Error(String),
    Canceled,
    NotAvailable,
}

pub trait Authenticator {
    /// Blocks until the user answers the prompt.
    fn authenticate(&self, title: &str, subtitle: &str) -> AuthOutcome;
}

pub trait DeviceIdentity {
    fn device_id(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckIn {
    Verified { payload: Payload, device_id: String },
    Rejected { payload: Payload, outcome: AuthOutcome },
    Unreadable { raw: String, reason: String },
}

pub fn check_in(
    raw: &str,
    authenticator: &dyn Authenticator,
    device: &dyn DeviceIdentity,
) -> CheckIn {
    check_in_parsed(payload::parse(raw), authenticator, device)
}

/// Same as [`check_in`] for a payload that was already parsed, e.g. by [`crate::scan`].
pub fn check_in_parsed(
    parsed: ParsedPayload,
    authenticator: &dyn Authenticator,
    device: &dyn DeviceIdentity,
) -> CheckIn {
    let payload = match parsed {
        ParsedPayload::Structured(payload) => payload,
        ParsedPayload::Unstructured { raw, reason } => return CheckIn::Unreadable { raw, reason },
    };

    match authenticator.authenticate(PROMPT_TITLE, PROMPT_SUBTITLE) {
        AuthOutcome::Success => {
            let device_id = device.device_id();
            tracing::info!(session_id = payload.session_id, "check-in verified");
            CheckIn::Verified { payload, device_id }
        }
        outcome => {
            tracing::info!(session_id = payload.session_id, ?outcome, "check-in not verified");
            CheckIn::Rejected { payload, outcome }
        }
    }
}
