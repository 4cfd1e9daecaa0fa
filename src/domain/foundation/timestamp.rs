//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parses an ISO-8601 string with an explicit offset.
    pub fn parse_iso8601(s: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc)))
    }

    /// Formats as ISO-8601 with millisecond precision, e.g. `2024-01-15T10:30:00.000Z`.
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Drops precision below one millisecond, the resolution of the
    /// persisted form.
    pub fn truncated_to_millis(&self) -> Self {
        Self(self.0.trunc_subsecs(3))
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Creates a new timestamp by subtracting the specified number of hours.
    pub fn minus_hours(&self, hours: i64) -> Self {
        Self(self.0 - Duration::hours(hours))
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Returns `None` when the value is outside the representable range.
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }

    /// Human-readable age relative to `now`.
    ///
    /// Under an hour is "Just now", then whole hours, then whole days up to
    /// 30, after which the calendar date is shown.
    pub fn age_label(&self, now: &Timestamp) -> String {
        let hours = now.duration_since(self).num_hours();
        if hours < 1 {
            return "Just now".to_string();
        }
        if hours < 24 {
            return format!("{} hour{} ago", hours, plural(hours));
        }
        let days = hours / 24;
        if days < 30 {
            return format!("{} day{} ago", days, plural(days));
        }
        self.0.format("%b %-d, %Y").to_string()
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
