//! UI layer for the roster desk: the egui app shell.

pub mod app;

pub use app::RosterDeskApp;
