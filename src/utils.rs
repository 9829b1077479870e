//! Utility helpers shared across agentctl.

use serde_json::Value;

/// Render JSON with pretty formatting, falling back to a compact string on error.
#[must_use]
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Truncate a string to a maximum length, adding an ellipsis if truncated
#[must_use]
pub fn truncate_with_ellipsis(s: &str, max_len: usize, ellipsis: &str) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let truncate_at = max_len.saturating_sub(ellipsis.len());
        format!("{}{}", &s[..truncate_at], ellipsis)
    }
}

/// Format a cost in dollars for display, or a dash when absent.
#[must_use]
pub fn fmt_cost(cost: Option<f64>) -> String {
    match cost {
        Some(cost) => format!("${cost:.4}"),
        None => "-".to_string(),
    }
}
