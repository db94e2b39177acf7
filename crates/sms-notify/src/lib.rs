//! Notification generation for data records.
//!
//! This crate derives the outbound messages a record owes:
//!
//! - **template**: `Label: value` rendering of a form's task template
//! - **tasks**: pending tasks for the resolved recipient tiers, and the
//!   acknowledgement reply to the reporter

pub mod tasks;
pub mod template;

pub use tasks::{acknowledge, generate_tasks};
pub use template::render_message;
