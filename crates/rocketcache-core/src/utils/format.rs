use chrono::NaiveDateTime;
use tracing::debug;

/// Upstream timestamps, with and without milliseconds
const UTC_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.3fZ", "%Y-%m-%dT%H:%M:%SZ"];

const DISPLAY_DATE_FORMAT: &str = "%b %d, %Y";
const DISPLAY_TIME_FORMAT: &str = "%H:%M";

/// Split an ISO-8601 UTC timestamp into display date and time,
/// e.g. "2006-03-24T22:30:00.000Z" -> ("Mar 24, 2006", "22:30").
///
/// Never fails: a string in neither accepted format comes back
/// unchanged as the date, with an empty time.
pub fn format_date_time(date_utc: &str) -> (String, String) {
    for format in UTC_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_utc, format) {
            return (
                dt.format(DISPLAY_DATE_FORMAT).to_string(),
                dt.format(DISPLAY_TIME_FORMAT).to_string(),
            );
        }
    }

    debug!(date = date_utc, "Unparseable launch date, passing through");
    (date_utc.to_string(), String::new())
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
