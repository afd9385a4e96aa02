//! Chat Service Layer
//!
//! Participant operations, message visibility and the inactivity reaper.

pub mod manager;
pub mod reaper;
pub mod visibility;

pub use manager::ChatManager;
pub use reaper::InactivityReaper;
pub use visibility::filter_messages;
