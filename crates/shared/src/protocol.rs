use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Wire form of one activity in the `GET /activities` response. The response
/// is a JSON object keyed by activity name, so the name is not repeated in
/// the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDetails {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

/// `GET /activities` response body. The JSON object carries no ordering, so
/// a `BTreeMap` pins iteration (and display) order to the activity names.
pub type RosterByName = BTreeMap<String, ActivityDetails>;

/// Success body of the signup and unregister endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationAck {
    pub message: String,
}

/// Failure body the server attaches to non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionBody {
    pub detail: String,
}
