//! Utility helpers shared by the feed and sink clients.
//!
//! IMPORTANT:
//! - No feed- or sink-specific business logic should live here.
//! - This module must remain lightweight and deterministic.
//!

/// Shortens a response body for log output.
///
/// Cuts on a char boundary so multi-byte bodies never panic.
pub fn truncate_for_log(raw: &str, max_chars: usize) -> String {
    match raw.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &raw[..idx]),
        None => raw.to_string(),
    }
}
