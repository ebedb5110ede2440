//! Backend worker: owns the HTTP client and a tokio runtime on a dedicated
//! thread, drains the command queue, and reports results as UI events.

use std::thread;

use client_core::{RosterApi, RosterClient};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{
    describe_failure, UiEvent, ROSTER_FETCH_FAILED, SIGNUP_REJECTED_FALLBACK,
    SIGNUP_TRANSPORT_FALLBACK, UNREGISTER_REJECTED_FALLBACK, UNREGISTER_TRANSPORT_FALLBACK,
};

/// Spawns the worker thread. It runs until the command channel disconnects,
/// which happens when the UI side drops its sender on shutdown.
pub fn launch(server_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::WorkerFailed(format!(
                    "backend worker startup failure: {err}"
                )));
                return;
            }
        };

        let client = match RosterClient::new(&server_url) {
            Ok(client) => client,
            Err(err) => {
                tracing::error!(%server_url, "invalid server url: {err}");
                let _ = ui_tx.try_send(UiEvent::WorkerFailed(format!(
                    "backend worker startup failure: {err}"
                )));
                return;
            }
        };

        runtime.block_on(run_dispatch_loop(&client, &cmd_rx, &ui_tx));
    });
}

/// One pass per queued command. Mutations re-fetch the roster on success so
/// every card and the selector reflect the change; exactly one fetch per
/// successful mutation.
async fn run_dispatch_loop<A: RosterApi>(
    api: &A,
    cmd_rx: &Receiver<BackendCommand>,
    ui_tx: &Sender<UiEvent>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            BackendCommand::RefreshRoster => {
                refresh_roster(api, ui_tx).await;
            }
            BackendCommand::Signup { email, activity } => {
                tracing::debug!(%email, %activity, "backend: signup");
                match api.signup(&activity, &email).await {
                    Ok(message) => {
                        let _ = ui_tx.try_send(UiEvent::SignupFinished {
                            outcome: Ok(message),
                        });
                        refresh_roster(api, ui_tx).await;
                    }
                    Err(err) => {
                        let _ = ui_tx.try_send(UiEvent::SignupFinished {
                            outcome: Err(describe_failure(
                                &err,
                                SIGNUP_REJECTED_FALLBACK,
                                SIGNUP_TRANSPORT_FALLBACK,
                            )),
                        });
                    }
                }
            }
            BackendCommand::Unregister { email, activity } => {
                tracing::debug!(%email, %activity, "backend: unregister");
                match api.unregister(&activity, &email).await {
                    Ok(_message) => {
                        refresh_roster(api, ui_tx).await;
                        let _ = ui_tx.try_send(UiEvent::UnregisterFinished {
                            email,
                            activity,
                            outcome: Ok(()),
                        });
                    }
                    Err(err) => {
                        let _ = ui_tx.try_send(UiEvent::UnregisterFinished {
                            email,
                            activity,
                            outcome: Err(describe_failure(
                                &err,
                                UNREGISTER_REJECTED_FALLBACK,
                                UNREGISTER_TRANSPORT_FALLBACK,
                            )),
                        });
                    }
                }
            }
        }
    }
}

async fn refresh_roster<A: RosterApi>(api: &A, ui_tx: &Sender<UiEvent>) {
    match api.fetch_activities().await {
        Ok(activities) => {
            let _ = ui_tx.try_send(UiEvent::RosterLoaded(activities));
        }
        Err(err) => {
            tracing::error!("failed to fetch activities: {err}");
            let _ = ui_tx.try_send(UiEvent::RosterUnavailable(ROSTER_FETCH_FAILED.to_string()));
        }
    }
}
