//! Common utility functions used across Parley components

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Count whitespace-separated words, the unit of the fallback token estimate
pub fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// Truncate string to the given number of characters with an ellipsis
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        "...".to_string()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    }
}

/// Format duration in seconds to human-readable string
pub fn format_duration_secs(seconds: f64) -> String {
    if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.1}s", seconds)
    } else if seconds < 3600.0 {
        let minutes = seconds / 60.0;
        format!("{:.1}m", minutes)
    } else {
        let hours = seconds / 3600.0;
        format!("{:.1}h", hours)
    }
}
