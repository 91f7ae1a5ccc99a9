//! Model to entity mappers
//!
//! - `From<Model> for Entity`: convert database rows to domain objects
//! - `*Insert` structs: prepare entity data for database writes

mod conversation;
mod notification;
mod pulse;
mod user;

pub use pulse::PulseInsert;
pub use user::visibility_from_db;
