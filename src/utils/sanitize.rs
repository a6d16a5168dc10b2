//! Utilities for sanitizing scraped text and error messages.
//!
//! Removes control characters from error messages before they are returned
//! to API clients, and collapses the whitespace runs that markup leaves inside
//! extracted text nodes.

/// Sanitizes an error message by removing control characters.
///
/// Control characters (0x00-0x1F, except newline/tab/carriage return) can cause
/// issues when rendered by clients or written to logs.
pub fn sanitize_error_message(message: &str) -> String {
    message
        .chars()
        .filter(|c| {
            let code = *c as u32;
            code >= 0x20 // Printable ASCII starts at 0x20 (space)
                || code == 0x09 // Tab
                || code == 0x0A // Newline
                || code == 0x0D // Carriage return
        })
        .collect()
}

/// Sanitizes and truncates an error message to `MAX_ERROR_MESSAGE_LENGTH` characters.
///
/// Truncation counts characters, not bytes, so multi-byte text never splits.
pub fn sanitize_and_truncate_error_message(message: &str) -> String {
    let sanitized = sanitize_error_message(message);
    let char_count = sanitized.chars().count();

    if char_count > crate::config::MAX_ERROR_MESSAGE_LENGTH {
        // Leave room for the truncation note
        let keep = crate::config::MAX_ERROR_MESSAGE_LENGTH.saturating_sub(50);
        let truncated: String = sanitized.chars().take(keep).collect();
        format!(
            "{}... (truncated, original length: {} chars)",
            truncated, char_count
        )
    } else {
        sanitized
    }
}

/// Collapses every whitespace run (including newlines and NBSP) into one space and trims.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
