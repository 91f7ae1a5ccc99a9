//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the length of one
//! request and orchestrates repositories plus the activity fan-out.

pub mod activity;
pub mod context;
pub mod engagement;
pub mod error;
pub mod messaging;
pub mod notification;
pub mod pulse;
pub mod stats;
pub mod user;

pub use activity::ActivityService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use engagement::EngagementService;
pub use error::{ServiceError, ServiceResult};
pub use messaging::{MessagingService, DEFAULT_CONVERSATION_LIMIT, DEFAULT_MESSAGE_LIMIT};
pub use notification::NotificationService;
pub use pulse::PulseService;
pub use stats::StatsService;
pub use user::UserService;
