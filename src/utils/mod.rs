pub mod logging;
pub mod time;

pub use time::{format_time, parse_timestamp};
