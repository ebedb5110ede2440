//! Controller layer: UI events, user-facing failure wording, and command dispatch.

pub mod events;
pub mod orchestration;
