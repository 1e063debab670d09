//! HTTP conditional request module
//!
//! `Last-Modified` / `If-Modified-Since` handling at one-second resolution,
//! which is all HTTP dates can express.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Format a modification time as an HTTP date
pub fn format_last_modified(modified: SystemTime) -> String {
    httpdate::fmt_http_date(modified)
}

/// Check whether the client's cached copy is still current
///
/// Returns true (respond 304) when `If-Modified-Since` parses and is not older
/// than `modified`. Unparseable dates are ignored.
pub fn not_modified_since(if_modified_since: Option<&str>, modified: Option<SystemTime>) -> bool {
    let (Some(header), Some(modified)) = (if_modified_since, modified) else {
        return false;
    };
    let Ok(since) = httpdate::parse_http_date(header.trim()) else {
        return false;
    };
    truncate_to_seconds(modified) <= since
}

fn truncate_to_seconds(time: SystemTime) -> SystemTime {
    time.duration_since(UNIX_EPOCH)
        .map_or(time, |d| UNIX_EPOCH + Duration::from_secs(d.as_secs()))
}
