//! # pulse-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    ActivityService, EngagementService, MessagingService, NotificationService, PulseService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, StatsService, UserService,
};
