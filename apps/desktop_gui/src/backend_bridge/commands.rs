//! Backend commands queued from UI to backend worker.

pub enum BackendCommand {
    RefreshRoster,
    Signup { email: String, activity: String },
    Unregister { email: String, activity: String },
}
