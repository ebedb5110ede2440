//! Events flowing from the backend worker to the UI, and the wording shown
//! to the user when an operation fails.

use client_core::ClientError;
use shared::domain::Activity;

/// Shown in the roster area when the activity list cannot be fetched.
pub const ROSTER_FETCH_FAILED: &str = "Failed to load activities. Please try again later.";

/// Signup fallbacks: a rejection without a usable `detail`, then anything
/// that never produced a usable response.
pub const SIGNUP_REJECTED_FALLBACK: &str = "An error occurred";
pub const SIGNUP_TRANSPORT_FALLBACK: &str = "Failed to sign up. Please try again.";

/// Unregister fallbacks, same split.
pub const UNREGISTER_REJECTED_FALLBACK: &str = "Failed to remove participant.";
pub const UNREGISTER_TRANSPORT_FALLBACK: &str = "Error removing participant.";

#[derive(Debug)]
pub enum UiEvent {
    RosterLoaded(Vec<Activity>),
    RosterUnavailable(String),
    SignupFinished {
        outcome: Result<String, String>,
    },
    UnregisterFinished {
        email: String,
        activity: String,
        outcome: Result<(), String>,
    },
    WorkerFailed(String),
}

/// Maps a client failure to the message the user sees. A server-supplied
/// `detail` wins; a rejection without one gets `rejected_fallback`; transport
/// failures and bodies that never parsed get `transport_fallback`.
pub fn describe_failure(
    err: &ClientError,
    rejected_fallback: &str,
    transport_fallback: &str,
) -> String {
    match err {
        ClientError::Rejected {
            detail: Some(detail),
            ..
        } => detail.clone(),
        ClientError::Rejected { detail: None, .. } => rejected_fallback.to_string(),
        _ => transport_fallback.to_string(),
    }
}
