//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp attached to telemetry readings.
pub type Timestamp = DateTime<Utc>;

/// Convert a platform timestamp (milliseconds since the Unix epoch).
///
/// Returns `None` when the value is outside chrono's representable range.
#[must_use]
pub fn from_millis(millis: i64) -> Option<Timestamp> {
    DateTime::from_timestamp_millis(millis)
}
