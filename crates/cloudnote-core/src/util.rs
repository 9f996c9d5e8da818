//! Small helpers shared by the config, store and CLI layers.

/// Trim `value`, treating blank text the same as no text.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Whether `value` is an `http://` or `https://` URL.
pub fn is_http_url(value: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| value.starts_with(scheme))
}

/// Longest response body quoted in an error message, in characters
const MAX_QUOTED_CHARS: usize = 180;

/// Trimmed prefix of a response body, for quoting in errors.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(MAX_QUOTED_CHARS).collect()
}

/// Milliseconds since the Unix epoch, used for row timestamps.
pub fn unix_timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
