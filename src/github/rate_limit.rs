// src/github/rate_limit.rs
// =============================================================================
// GitHub's rate-limit headers.
//
// Every API response carries:
//   X-RateLimit-Limit:     requests allowed per window (60 anonymous, 5000 with a token)
//   X-RateLimit-Remaining: requests left in the current window
//   X-RateLimit-Reset:     unix timestamp (seconds) when the window resets
//
// A 403 only means "rate limited" when Remaining is exactly 0. Any other 403
// is a plain permission problem.
// =============================================================================

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::header::HeaderMap;

pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimit {
    pub remaining: u64,
    pub limit: Option<u64>,
    pub reset_at: Option<DateTime<Utc>>,
}

impl RateLimit {
    // Reads the quota headers. None when the Remaining header is missing or
    // is not a number, since then we cannot tell whether we are limited.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let remaining = header_number(headers, REMAINING_HEADER)?;
        let limit = header_number(headers, LIMIT_HEADER);
        let reset_at = header_number(headers, RESET_HEADER)
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0));

        Some(Self {
            remaining,
            limit,
            reset_at,
        })
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Time left until the quota resets, if GitHub told us when that is.
    pub fn wait_from(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.reset_at.map(|reset| reset - now)
    }
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

// Formats a wait as a rough human distance.
//
// Under an hour we show whole minutes, rounded up so "4m 59s" reads as
// "5 minutes" and never "0 minutes". The unit is picked from the exact wait,
// so 59m 59s stays "59 minutes". From an hour on we show whole hours.
pub fn describe_wait(wait: TimeDelta) -> String {
    let secs = wait.num_seconds().max(0);

    if secs < 3600 {
        let minutes = ((secs + 59) / 60).clamp(1, 59);
        plural(minutes, "minute")
    } else {
        plural(secs / 3600, "hour")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}
