//! Prompt helpers for fingerprinting and log previews.

use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a prompt string.
///
/// Logged at startup so operators can tell which persona a running bot uses
/// without printing the prompt itself.
pub fn hash_prompt(prompt: &str) -> String {
    Sha256::digest(prompt.as_bytes())
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

/// Shorten text for log lines, respecting char boundaries.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
