//! Display timezone helpers
//!
//! Timestamps are stored in UTC and shown in US/Eastern.

use chrono::{DateTime, Utc};
use chrono_tz::America::New_York;
use chrono_tz::Tz;

/// Timezone used for every rendered timestamp
pub const DISPLAY_TZ: Tz = New_York;

/// Convert a stored UTC timestamp to US/Eastern.
pub fn to_eastern(ts: DateTime<Utc>) -> DateTime<Tz> {
    ts.with_timezone(&DISPLAY_TZ)
}

/// Human-readable Eastern timestamp, e.g. `2024-07-04 08:30 EDT`.
pub fn format_eastern(ts: DateTime<Utc>) -> String {
    to_eastern(ts).format("%Y-%m-%d %H:%M %Z").to_string()
}
