//! The roster desk app: activity cards, the signup form, the confirmation
//! dialog, and the transient status line.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Activity;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;

/// How long the signup status line stays visible before auto-dismissing.
const STATUS_DISMISS_AFTER: Duration = Duration::from_secs(5);

const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(67, 181, 129);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 96, 96);

/// The activities area holds exactly one of these at a time. Every roster
/// response replaces the whole view; nothing is patched in place.
enum RosterView {
    Loading,
    Loaded(Vec<Activity>),
    Unavailable(String),
}

struct StatusLine {
    text: String,
    is_error: bool,
    shown_at: Instant,
}

enum DialogMode {
    /// Yes/Cancel before a destructive action; the pending removal rides
    /// along so confirmation knows what to send.
    Confirm { email: String, activity: String },
    /// Single Close button, used to report outcomes.
    Notice,
}

/// The one reusable dialog. Opening it while already shown overwrites the
/// prior content and pending action; there is no queue.
struct Dialog {
    message: String,
    is_error: bool,
    mode: DialogMode,
}

enum DialogAction {
    Keep,
    Confirm,
    Dismiss,
}

pub struct RosterDeskApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    roster: RosterView,
    email_input: String,
    selected_activity: Option<String>,
    status: Option<StatusLine>,
    dialog: Option<Dialog>,
}

impl RosterDeskApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            roster: RosterView::Loading,
            email_input: String::new(),
            selected_activity: None,
            status: None,
            dialog: None,
        };
        app.dispatch(BackendCommand::RefreshRoster, Instant::now());
        app
    }

    fn dispatch(&mut self, cmd: BackendCommand, now: Instant) {
        if let Err(message) = dispatch_backend_command(&self.cmd_tx, cmd) {
            self.set_status(message, true, now);
        }
    }

    fn set_status(&mut self, text: String, is_error: bool, now: Instant) {
        self.status = Some(StatusLine {
            text,
            is_error,
            shown_at: now,
        });
    }

    fn expire_status(&mut self, now: Instant) {
        if let Some(status) = &self.status {
            if now.duration_since(status.shown_at) >= STATUS_DISMISS_AFTER {
                self.status = None;
            }
        }
    }

    fn process_ui_events(&mut self, now: Instant) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event, now);
        }
    }

    fn apply_event(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::RosterLoaded(activities) => {
                // A selection that vanished from the new roster is dropped.
                if let Some(selected) = &self.selected_activity {
                    if !activities.iter().any(|activity| &activity.name == selected) {
                        self.selected_activity = None;
                    }
                }
                self.roster = RosterView::Loaded(activities);
            }
            UiEvent::RosterUnavailable(message) => {
                self.roster = RosterView::Unavailable(message);
                self.selected_activity = None;
            }
            UiEvent::SignupFinished { outcome } => match outcome {
                Ok(message) => {
                    self.set_status(message, false, now);
                    self.email_input.clear();
                    self.selected_activity = None;
                }
                Err(message) => self.set_status(message, true, now),
            },
            UiEvent::UnregisterFinished {
                email,
                activity,
                outcome,
            } => {
                self.dialog = Some(match outcome {
                    Ok(()) => Dialog {
                        message: format!("{email} was removed from {activity}."),
                        is_error: false,
                        mode: DialogMode::Notice,
                    },
                    Err(message) => Dialog {
                        message,
                        is_error: true,
                        mode: DialogMode::Notice,
                    },
                });
            }
            UiEvent::WorkerFailed(message) => self.set_status(message, true, now),
        }
    }

    fn form_submittable(&self) -> bool {
        looks_like_email(&self.email_input) && self.selected_activity.is_some()
    }

    fn submit_signup(&mut self, now: Instant) {
        if !self.form_submittable() {
            return;
        }
        let email = self.email_input.trim().to_string();
        let activity = self.selected_activity.clone().unwrap_or_default();
        self.dispatch(BackendCommand::Signup { email, activity }, now);
    }

    /// Opens the confirmation dialog; nothing is sent until the user says Yes.
    fn request_removal(&mut self, email: String, activity: String) {
        self.dialog = Some(Dialog {
            message: format!("Remove {email} from {activity}?"),
            is_error: false,
            mode: DialogMode::Confirm { email, activity },
        });
    }

    fn confirm_removal(&mut self, now: Instant) {
        if let Some(Dialog {
            mode: DialogMode::Confirm { email, activity },
            ..
        }) = self.dialog.take()
        {
            self.dispatch(BackendCommand::Unregister { email, activity }, now);
        }
    }

    fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    fn activity_names(&self) -> Vec<String> {
        match &self.roster {
            RosterView::Loaded(activities) => activities
                .iter()
                .map(|activity| activity.name.clone())
                .collect(),
            _ => Vec::new(),
        }
    }

    fn show_activity_cards(&mut self, ui: &mut egui::Ui) {
        let mut removal_request: Option<(String, String)> = None;

        match &self.roster {
            RosterView::Loading => {
                ui.weak("Loading activities...");
            }
            RosterView::Unavailable(message) => {
                ui.colored_label(ERROR_COLOR, message);
            }
            RosterView::Loaded(activities) => {
                for activity in activities {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.heading(&activity.name);
                        ui.label(&activity.description);
                        ui.label(format!("Schedule: {}", activity.schedule));
                        ui.label(format!("Spots left: {}", activity.spots_left()));
                        ui.separator();
                        ui.label(egui::RichText::new("Participants").strong());
                        if activity.participants.is_empty() {
                            ui.weak("No participants yet.");
                        } else {
                            for participant in &activity.participants {
                                ui.horizontal(|ui| {
                                    ui.label(participant);
                                    ui.with_layout(
                                        egui::Layout::right_to_left(egui::Align::Center),
                                        |ui| {
                                            if ui.small_button("Remove").clicked() {
                                                removal_request = Some((
                                                    participant.clone(),
                                                    activity.name.clone(),
                                                ));
                                            }
                                        },
                                    );
                                });
                            }
                        }
                    });
                    ui.add_space(6.0);
                }
            }
        }

        if let Some((email, activity)) = removal_request {
            self.request_removal(email, activity);
        }
    }

    fn show_signup_form(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.label(egui::RichText::new("Sign up for an activity").strong());
        let names = self.activity_names();

        ui.horizontal(|ui| {
            ui.label("Email");
            ui.add(
                egui::TextEdit::singleline(&mut self.email_input)
                    .hint_text("you@example.edu")
                    .desired_width(220.0),
            );

            egui::ComboBox::from_id_source("activity_select")
                .selected_text(
                    self.selected_activity
                        .as_deref()
                        .unwrap_or("Select an activity"),
                )
                .show_ui(ui, |ui| {
                    for name in &names {
                        ui.selectable_value(
                            &mut self.selected_activity,
                            Some(name.clone()),
                            name,
                        );
                    }
                });

            if ui
                .add_enabled(self.form_submittable(), egui::Button::new("Sign Up"))
                .clicked()
            {
                self.submit_signup(now);
            }
        });

        if let Some(status) = &self.status {
            let color = if status.is_error {
                ERROR_COLOR
            } else {
                SUCCESS_COLOR
            };
            ui.colored_label(color, &status.text);
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context, now: Instant) {
        let mut action = DialogAction::Keep;

        if let Some(dialog) = &self.dialog {
            let title = match dialog.mode {
                DialogMode::Confirm { .. } => "Confirm removal",
                DialogMode::Notice => "Notice",
            };
            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    let text = egui::RichText::new(&dialog.message);
                    if dialog.is_error {
                        ui.label(text.color(ERROR_COLOR));
                    } else {
                        ui.label(text);
                    }
                    ui.add_space(8.0);
                    ui.horizontal(|ui| match dialog.mode {
                        DialogMode::Confirm { .. } => {
                            if ui.button("Yes").clicked() {
                                action = DialogAction::Confirm;
                            }
                            if ui.button("Cancel").clicked() {
                                action = DialogAction::Dismiss;
                            }
                        }
                        DialogMode::Notice => {
                            if ui.button("Close").clicked() {
                                action = DialogAction::Dismiss;
                            }
                        }
                    });
                });
        }

        match action {
            DialogAction::Keep => {}
            DialogAction::Confirm => self.confirm_removal(now),
            DialogAction::Dismiss => self.dismiss_dialog(),
        }
    }
}

impl eframe::App for RosterDeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.process_ui_events(now);
        self.expire_status(now);

        let dialog_open = self.dialog.is_some();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!dialog_open, |ui| {
                ui.heading("Activity Roster Desk");
                ui.add_space(4.0);
                egui::ScrollArea::vertical()
                    .auto_shrink([false, true])
                    .max_height(ui.available_height() - 90.0)
                    .show(ui, |ui| {
                        self.show_activity_cards(ui);
                    });
                ui.separator();
                self.show_signup_form(ui, now);
            });
        });

        self.show_dialog(ctx, now);

        // Keeps the status-line expiry from waiting on the next input event.
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    if value.contains(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;

    fn activity(name: &str, participants: &[&str]) -> Activity {
        Activity {
            name: name.to_string(),
            description: "desc".to_string(),
            schedule: "Fridays".to_string(),
            max_participants: 12,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn test_app() -> (RosterDeskApp, Receiver<BackendCommand>, Sender<UiEvent>) {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        let app = RosterDeskApp::new(cmd_tx, ui_rx);
        // Drain the startup refresh so tests see only their own commands.
        assert!(matches!(cmd_rx.try_recv(), Ok(BackendCommand::RefreshRoster)));
        (app, cmd_rx, ui_tx)
    }

    #[test]
    fn startup_requests_one_roster_refresh() {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (_ui_tx, ui_rx) = bounded(8);
        let _app = RosterDeskApp::new(cmd_tx, ui_rx);
        assert!(matches!(cmd_rx.try_recv(), Ok(BackendCommand::RefreshRoster)));
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn loaded_roster_drops_a_selection_that_no_longer_exists() {
        let (mut app, _cmd_rx, _ui_tx) = test_app();
        app.selected_activity = Some("Chess Club".to_string());

        app.apply_event(
            UiEvent::RosterLoaded(vec![activity("Gym Class", &[])]),
            Instant::now(),
        );

        assert!(app.selected_activity.is_none());
        assert!(matches!(app.roster, RosterView::Loaded(_)));
    }

    #[test]
    fn loaded_roster_keeps_a_selection_that_survives() {
        let (mut app, _cmd_rx, _ui_tx) = test_app();
        app.selected_activity = Some("Chess Club".to_string());

        app.apply_event(
            UiEvent::RosterLoaded(vec![activity("Chess Club", &["a@x.com"])]),
            Instant::now(),
        );

        assert_eq!(app.selected_activity.as_deref(), Some("Chess Club"));
    }

    #[test]
    fn unavailable_roster_shows_the_notice_and_clears_the_selector() {
        let (mut app, _cmd_rx, _ui_tx) = test_app();
        app.selected_activity = Some("Chess Club".to_string());

        app.apply_event(
            UiEvent::RosterUnavailable(
                "Failed to load activities. Please try again later.".to_string(),
            ),
            Instant::now(),
        );

        match &app.roster {
            RosterView::Unavailable(message) => {
                assert_eq!(message, "Failed to load activities. Please try again later.");
            }
            _ => panic!("roster should be unavailable"),
        }
        assert!(app.selected_activity.is_none());
        assert!(app.activity_names().is_empty());
    }

    #[test]
    fn signup_success_shows_the_message_and_clears_the_form() {
        let (mut app, _cmd_rx, _ui_tx) = test_app();
        app.email_input = "a@x.com".to_string();
        app.selected_activity = Some("Chess Club".to_string());

        app.apply_event(
            UiEvent::SignupFinished {
                outcome: Ok("Signed up!".to_string()),
            },
            Instant::now(),
        );

        let status = app.status.as_ref().expect("status set");
        assert_eq!(status.text, "Signed up!");
        assert!(!status.is_error);
        assert!(app.email_input.is_empty());
        assert!(app.selected_activity.is_none());
    }

    #[test]
    fn signup_failure_keeps_the_form_and_styles_the_status_as_an_error() {
        let (mut app, _cmd_rx, _ui_tx) = test_app();
        app.email_input = "a@x.com".to_string();
        app.selected_activity = Some("Chess Club".to_string());

        app.apply_event(
            UiEvent::SignupFinished {
                outcome: Err("An error occurred".to_string()),
            },
            Instant::now(),
        );

        let status = app.status.as_ref().expect("status set");
        assert_eq!(status.text, "An error occurred");
        assert!(status.is_error);
        assert_eq!(app.email_input, "a@x.com");
        assert_eq!(app.selected_activity.as_deref(), Some("Chess Club"));
    }

    #[test]
    fn status_auto_dismisses_after_five_seconds() {
        let (mut app, _cmd_rx, _ui_tx) = test_app();
        let shown_at = Instant::now();
        app.set_status("Signed up!".to_string(), false, shown_at);

        app.expire_status(shown_at + Duration::from_millis(4_999));
        assert!(app.status.is_some());

        app.expire_status(shown_at + Duration::from_secs(5));
        assert!(app.status.is_none());
    }

    #[test]
    fn submit_signup_queues_one_command_with_the_form_values() {
        let (mut app, cmd_rx, _ui_tx) = test_app();
        app.email_input = " a@x.com ".to_string();
        app.selected_activity = Some("Chess Club".to_string());

        app.submit_signup(Instant::now());

        match cmd_rx.try_recv() {
            Ok(BackendCommand::Signup { email, activity }) => {
                assert_eq!(email, "a@x.com");
                assert_eq!(activity, "Chess Club");
            }
            _ => panic!("expected a signup command"),
        }
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn submit_signup_ignores_an_unsubmittable_form() {
        let (mut app, cmd_rx, _ui_tx) = test_app();
        app.email_input = "not-an-email".to_string();
        app.selected_activity = Some("Chess Club".to_string());
        app.submit_signup(Instant::now());

        app.email_input = "a@x.com".to_string();
        app.selected_activity = None;
        app.submit_signup(Instant::now());

        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn removal_asks_for_confirmation_before_sending_anything() {
        let (mut app, cmd_rx, _ui_tx) = test_app();

        app.request_removal("a@x.com".to_string(), "Chess Club".to_string());

        let dialog = app.dialog.as_ref().expect("dialog open");
        assert_eq!(dialog.message, "Remove a@x.com from Chess Club?");
        assert!(!dialog.is_error);
        assert!(matches!(dialog.mode, DialogMode::Confirm { .. }));
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn confirming_removal_sends_exactly_one_unregister_command() {
        let (mut app, cmd_rx, _ui_tx) = test_app();
        app.request_removal("a@x.com".to_string(), "Chess Club".to_string());

        app.confirm_removal(Instant::now());

        assert!(app.dialog.is_none());
        match cmd_rx.try_recv() {
            Ok(BackendCommand::Unregister { email, activity }) => {
                assert_eq!(email, "a@x.com");
                assert_eq!(activity, "Chess Club");
            }
            _ => panic!("expected an unregister command"),
        }
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn cancelling_the_dialog_sends_nothing() {
        let (mut app, cmd_rx, _ui_tx) = test_app();
        app.request_removal("a@x.com".to_string(), "Chess Club".to_string());

        app.dismiss_dialog();

        assert!(app.dialog.is_none());
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn reopening_the_dialog_overwrites_the_pending_action() {
        let (mut app, cmd_rx, _ui_tx) = test_app();
        app.request_removal("a@x.com".to_string(), "Chess Club".to_string());
        app.request_removal("b@x.com".to_string(), "Gym Class".to_string());

        app.confirm_removal(Instant::now());

        match cmd_rx.try_recv() {
            Ok(BackendCommand::Unregister { email, activity }) => {
                assert_eq!(email, "b@x.com");
                assert_eq!(activity, "Gym Class");
            }
            _ => panic!("expected an unregister command"),
        }
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn unregister_outcome_reuses_the_dialog_as_a_notice() {
        let (mut app, _cmd_rx, _ui_tx) = test_app();

        app.apply_event(
            UiEvent::UnregisterFinished {
                email: "a@x.com".to_string(),
                activity: "Chess Club".to_string(),
                outcome: Ok(()),
            },
            Instant::now(),
        );
        let dialog = app.dialog.as_ref().expect("notice open");
        assert_eq!(dialog.message, "a@x.com was removed from Chess Club.");
        assert!(!dialog.is_error);
        assert!(matches!(dialog.mode, DialogMode::Notice));

        app.apply_event(
            UiEvent::UnregisterFinished {
                email: "a@x.com".to_string(),
                activity: "Chess Club".to_string(),
                outcome: Err("Failed to remove participant.".to_string()),
            },
            Instant::now(),
        );
        let dialog = app.dialog.as_ref().expect("notice open");
        assert_eq!(dialog.message, "Failed to remove participant.");
        assert!(dialog.is_error);
    }

    #[test]
    fn plausible_email_check_matches_the_form_rules() {
        assert!(looks_like_email("a@x.com"));
        assert!(looks_like_email("  first.last@school.example.edu "));
        assert!(!looks_like_email(""));
        assert!(!looks_like_email("plainaddress"));
        assert!(!looks_like_email("@x.com"));
        assert!(!looks_like_email("a@nodot"));
        assert!(!looks_like_email("a@.com"));
        assert!(!looks_like_email("a@x.com."));
        assert!(!looks_like_email("a b@x.com"));
        assert!(!looks_like_email("a@@x.com"));
    }
}
