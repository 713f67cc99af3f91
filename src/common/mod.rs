//! Common utilities shared by every command

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result, EXIT_OK, EXIT_SETUP_FAILED, EXIT_VALIDATION_FAILED};

/// Shorten a string to at most `max_len` characters, marking the cut with "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}
