//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Wall-clock time
//! - Local day boundaries (timezone offset is explicit, never ambient)

pub mod time;

pub use time::{Clock, ManualClock, SystemClock, day_marker, format_iso8601};
