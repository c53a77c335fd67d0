// Helper functions for safe logging

/// Number of characters of free text kept in log output
const LOGGED_TEXT_PREFIX_CHARS: usize = 8;

/// Truncates free-form user text for safe logging
/// Keeps a short prefix and the total length so entries stay correlatable
///
/// # Example
/// ```
/// use registration_form::common::safe_text_log;
/// let masked = safe_text_log("はじめまして、山田です。よろしくお願いします。");
/// assert_eq!(masked, "はじめまして、山...(23 chars)");
/// ```
pub fn safe_text_log(text: &str) -> String {
    let total = text.chars().count();
    if total <= LOGGED_TEXT_PREFIX_CHARS {
        return "*".repeat(total);
    }

    let prefix: String = text.chars().take(LOGGED_TEXT_PREFIX_CHARS).collect();
    format!("{}...({} chars)", prefix, total)
}

/// Masks a person's name for safe logging, keeping only the first character
pub fn safe_name_log(name: &str) -> String {
    match name.chars().next() {
        Some(first) => format!("{}***", first),
        None => String::new(),
    }
}
