//! Failure classification for generation attempts.
//!
//! A pure function from an error to the dispatcher's next action, kept
//! separate from the network layer so it can be unit-tested in isolation.

use studyforge_core::StudyError;

/// The dispatcher-relevant class of one failed generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The backend or the current key is saturated; switch credential and
    /// back off.
    RateLimited,
    /// The requested model variant is not served; try the next model on the
    /// same credential.
    ModelUnavailable,
    /// The credential was rejected; switch credential.
    CredentialInvalid,
    /// Anything else; not retried.
    Unknown,
}

/// Message fragments that indicate saturation rather than a hard failure.
const BUSY_MARKERS: &[&str] = &[
    "quota",
    "exhausted",
    "overloaded",
    "busy",
    "429",
    "rate limit",
];

/// Message fragments that indicate the credential itself was rejected.
const CREDENTIAL_MARKERS: &[&str] = &[
    "api key",
    "api_key",
    "credential",
    "unauthorized",
    "unauthenticated",
    "permission denied",
];

/// Message fragments that indicate the model variant is not served.
const MODEL_MARKERS: &[&str] = &["not found", "not supported", "unknown model"];

fn contains_any(message: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| message.contains(m))
}

/// Maps a failed attempt to exactly one [`FailureKind`].
///
/// Status-code signals win over substring heuristics. A 400 is ambiguous on
/// this backend (it reports both bad model names and invalid keys as
/// `INVALID_ARGUMENT`), so its message decides between credential and model.
pub fn classify(err: &StudyError) -> FailureKind {
    let message = match err {
        StudyError::Backend { status, message } => {
            let lower = message.to_lowercase();
            return match status {
                429 | 503 => FailureKind::RateLimited,
                401 | 403 => FailureKind::CredentialInvalid,
                404 => FailureKind::ModelUnavailable,
                400 => {
                    if contains_any(&lower, CREDENTIAL_MARKERS) {
                        FailureKind::CredentialInvalid
                    } else {
                        FailureKind::ModelUnavailable
                    }
                }
                _ => classify_by_message(&lower),
            };
        }
        StudyError::Transport(message) => message.to_lowercase(),
        _ => return FailureKind::Unknown,
    };
    classify_by_message(&message)
}

fn classify_by_message(lower: &str) -> FailureKind {
    if contains_any(lower, BUSY_MARKERS) {
        FailureKind::RateLimited
    } else if lower.contains("model") && contains_any(lower, MODEL_MARKERS) {
        FailureKind::ModelUnavailable
    } else if contains_any(lower, CREDENTIAL_MARKERS) {
        FailureKind::CredentialInvalid
    } else {
        FailureKind::Unknown
    }
}
