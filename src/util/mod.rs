//! Utility functions.

pub mod env;
pub mod format;
pub mod time;

pub use format::{format_quota, truncate_chars};
pub use time::{format_countdown, format_relative_time, from_unix_seconds};
