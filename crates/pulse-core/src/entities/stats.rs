//! Per-user daily activity statistics

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::value_objects::Snowflake;

/// One of the four independent daily counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatCounter {
    PulsesPosted,
    LikesReceived,
    NewFollowers,
    CommentsReceived,
}

impl StatCounter {
    /// Column on `user_daily_stats`
    pub fn column(&self) -> &'static str {
        match self {
            Self::PulsesPosted => "pulses_posted",
            Self::LikesReceived => "likes_received",
            Self::NewFollowers => "new_followers",
            Self::CommentsReceived => "comments_received",
        }
    }
}

/// Counters for one user on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyStat {
    pub user_id: Snowflake,
    pub stat_date: NaiveDate,
    pub pulses_posted: i64,
    pub likes_received: i64,
    pub new_followers: i64,
    pub comments_received: i64,
}

impl DailyStat {
    /// All-zero row for a day without activity
    pub fn empty(user_id: Snowflake, stat_date: NaiveDate) -> Self {
        Self {
            user_id,
            stat_date,
            pulses_posted: 0,
            likes_received: 0,
            new_followers: 0,
            comments_received: 0,
        }
    }
}

/// Sum of counters over a date range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatTotals {
    pub pulses_posted: i64,
    pub likes_received: i64,
    pub new_followers: i64,
    pub comments_received: i64,
}

impl StatTotals {
    pub fn sum<'a>(days: impl IntoIterator<Item = &'a DailyStat>) -> Self {
        days.into_iter().fold(Self::default(), |acc, d| Self {
            pulses_posted: acc.pulses_posted + d.pulses_posted,
            likes_received: acc.likes_received + d.likes_received,
            new_followers: acc.new_followers + d.new_followers,
            comments_received: acc.comments_received + d.comments_received,
        })
    }
}

/// Inclusive range covering the last `days` days, ending on `today`
pub fn trailing_range(today: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
    (today - Duration::days((days - 1).max(0)), today)
}
