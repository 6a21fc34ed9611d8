pub mod achievements;
pub mod config;
pub mod log;
pub mod seed;
pub mod stats;
pub mod system;
pub mod task;

use chrono::{NaiveDate, Utc};

/// Parse an optional `YYYY-MM-DD` argument, defaulting to today.
pub fn parse_as_of(arg: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match arg {
        Some(s) => Ok(s.parse()?),
        None => Ok(Utc::now().date_naive()),
    }
}
