//! Display formatting shared by every screen

use chrono::{DateTime, Local, Utc};

/// Timestamp format used when none is configured
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder for values the service did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// Render a call duration as `m:ss`
///
/// Missing and zero durations render as [`NOT_AVAILABLE`].
pub fn format_duration(seconds: Option<u32>) -> String {
    match seconds {
        None | Some(0) => NOT_AVAILABLE.to_string(),
        Some(total) => format!("{}:{:02}", total / 60, total % 60),
    }
}

/// Render a timestamp in the operator's local time zone
pub fn format_timestamp(timestamp: Option<&DateTime<Utc>>, format: &str) -> String {
    timestamp.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |ts| ts.with_timezone(&Local).format(format).to_string(),
    )
}

/// Pretty-print a JSON payload, falling back to its compact form
pub fn format_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(None, "N/A")]
    #[case(Some(0), "N/A")]
    #[case(Some(5), "0:05")]
    #[case(Some(60), "1:00")]
    #[case(Some(125), "2:05")]
    #[case(Some(3_725), "62:05")]
    fn test_format_duration(#[case] input: Option<u32>, #[case] expected: &str) {
        assert_eq!(format_duration(input), expected);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(None, DEFAULT_TIMESTAMP_FORMAT), "N/A");

        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 14, 25, 30).single();
        let expected = ts
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        assert_eq!(format_timestamp(ts.as_ref(), DEFAULT_TIMESTAMP_FORMAT), expected);
    }

    #[test]
    fn test_format_json() {
        let value = serde_json::json!({"eta": "8am"});
        assert_eq!(format_json(&value), "{\n  \"eta\": \"8am\"\n}");
    }
}
