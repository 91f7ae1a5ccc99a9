//! Value objects - immutable types that represent domain concepts

mod feed;
mod pagination;
mod snowflake;

pub use feed::{FeedFilter, TimeWindow};
pub use pagination::PageRequest;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
