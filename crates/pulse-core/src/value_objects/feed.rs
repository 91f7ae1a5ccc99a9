//! Feed mode and trailing time window

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Feed ordering/filtering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFilter {
    #[default]
    Latest,
    Popular,
    Following,
    Trending,
}

impl FeedFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Popular => "popular",
            Self::Following => "following",
            Self::Trending => "trending",
        }
    }

    /// Whether results are ordered by popularity score rather than recency
    pub fn ranks_by_score(&self) -> bool {
        matches!(self, Self::Popular | Self::Trending)
    }

    /// Whether results are restricted to the trailing window
    pub fn uses_window(&self) -> bool {
        matches!(self, Self::Trending)
    }
}

impl fmt::Display for FeedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(Self::Latest),
            "popular" => Ok(Self::Popular),
            "following" => Ok(Self::Following),
            "trending" => Ok(Self::Trending),
            other => Err(DomainError::ValidationError(format!(
                "Invalid feed filter: {other}"
            ))),
        }
    }
}

/// Trailing time range used by trending computations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "24h")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "24h",
            Self::Week => "7d",
            Self::Month => "30d",
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Self::Day => Duration::hours(24),
            Self::Week => Duration::days(7),
            Self::Month => Duration::days(30),
        }
    }

    /// Start of the window ending at `now`
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(Self::Day),
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            other => Err(DomainError::ValidationError(format!(
                "Invalid time window: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parsing() {
        assert_eq!("popular".parse::<FeedFilter>().unwrap(), FeedFilter::Popular);
        assert!("hot".parse::<FeedFilter>().is_err());
        assert_eq!(FeedFilter::default(), FeedFilter::Latest);
    }

    #[test]
    fn test_filter_ranking() {
        assert!(!FeedFilter::Latest.ranks_by_score());
        assert!(FeedFilter::Popular.ranks_by_score());
        assert!(FeedFilter::Trending.uses_window());
        assert!(!FeedFilter::Popular.uses_window());
    }

    #[test]
    fn test_window_serde_names() {
        let w: TimeWindow = serde_json::from_str("\"24h\"").unwrap();
        assert_eq!(w, TimeWindow::Day);
        assert_eq!(serde_json::to_string(&TimeWindow::Month).unwrap(), "\"30d\"");
        assert_eq!(TimeWindow::default(), TimeWindow::Week);
        assert!(serde_json::from_str::<TimeWindow>("\"1h\"").is_err());
    }

    #[test]
    fn test_window_since() {
        let now = Utc::now();
        assert_eq!(now - TimeWindow::Week.since(now), Duration::days(7));
    }
}
