//! Command orchestration from UI actions to the backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues one command for the backend worker without blocking the frame.
/// A full or disconnected queue comes back as the message to show the user.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), String> {
    let cmd_name = match &cmd {
        BackendCommand::RefreshRoster => "refresh_roster",
        BackendCommand::Signup { .. } => "signup",
        BackendCommand::Unregister { .. } => "unregister",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err("Command queue is full; please try again.".to_string()),
        Err(TrySendError::Disconnected(_)) => {
            Err("The backend worker is not running; restart the app.".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn queues_the_command_when_there_is_room() {
        let (tx, rx) = bounded(1);
        assert!(dispatch_backend_command(&tx, BackendCommand::RefreshRoster).is_ok());
        assert!(matches!(rx.try_recv(), Ok(BackendCommand::RefreshRoster)));
    }

    #[test]
    fn reports_a_full_queue_without_blocking() {
        let (tx, _rx) = bounded(1);
        dispatch_backend_command(&tx, BackendCommand::RefreshRoster)
            .unwrap_or_else(|message| panic!("first dispatch failed: {message}"));
        let message = dispatch_backend_command(&tx, BackendCommand::RefreshRoster).unwrap_err();
        assert!(message.contains("full"), "unexpected message: {message}");
    }

    #[test]
    fn reports_a_disconnected_worker() {
        let (tx, rx) = bounded::<BackendCommand>(1);
        drop(rx);
        let message = dispatch_backend_command(&tx, BackendCommand::RefreshRoster).unwrap_err();
        assert!(
            message.contains("not running"),
            "unexpected message: {message}"
        );
    }
}
