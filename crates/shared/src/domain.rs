use serde::{Deserialize, Serialize};

use crate::protocol::{ActivityDetails, RosterByName};

/// One club activity together with its participant roster.
///
/// The wire roster keys activities by name; this type carries the name
/// inline so the rest of the workspace can pass activities around as plain
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

impl Activity {
    pub fn from_entry(name: String, details: ActivityDetails) -> Self {
        Self {
            name,
            description: details.description,
            schedule: details.schedule,
            max_participants: details.max_participants,
            participants: details.participants,
        }
    }

    /// Remaining capacity, derived on demand so it can never go stale.
    /// Negative when the server has let the activity overbook.
    pub fn spots_left(&self) -> i64 {
        i64::from(self.max_participants) - self.participants.len() as i64
    }
}

/// Flattens the roster map into activities in display order. `RosterByName`
/// iterates sorted by key, so the result is ordered by activity name.
pub fn activities_from_roster(roster: RosterByName) -> Vec<Activity> {
    roster
        .into_iter()
        .map(|(name, details)| Activity::from_entry(name, details))
        .collect()
}
