//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod engagement;
pub mod health;
pub mod messages;
pub mod notifications;
pub mod pulses;
pub mod stats;
pub mod users;
