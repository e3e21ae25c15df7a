//! Parser warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the tokenizer and the tree builder to report markup they had to
//! recover from.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Global switch for stderr output. Recording continues while muted.
static MUTED: Mutex<bool> = Mutex::new(false);

fn warned() -> MutexGuard<'static, Option<HashSet<String>>> {
    // A panic while holding the lock leaves a plain set behind; keep using it.
    WARNED.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Warn about recovered markup (prints once per unique message)
///
/// # Example
/// ```
/// use ladle_common::warning::warn_once;
///
/// warn_once("Tokenizer", "unterminated comment at byte 12");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let first = warned().get_or_insert_with(HashSet::new).insert(key);

    let muted = *MUTED.lock().unwrap_or_else(PoisonError::into_inner);
    if first && !muted {
        eprintln!(
            "{} {}",
            format!("[ladle {component}]").yellow().bold(),
            format!("⚠ {message}").yellow()
        );
    }
}

/// Check whether a warning has already been recorded for `component`.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    warned().as_ref().is_some_and(|set| set.contains(&key))
}

/// Silence (or restore) stderr output. Warnings are still deduplicated and
/// recorded while muted.
pub fn set_muted(muted: bool) {
    *MUTED.lock().unwrap_or_else(PoisonError::into_inner) = muted;
}

/// Clear all recorded warnings (call between unrelated documents)
pub fn clear_warnings() {
    if let Some(set) = warned().as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_deduplicates() {
        set_muted(true);
        let message = "duplicate check for warn_once";
        assert!(!has_warned("Test", message));
        warn_once("Test", message);
        warn_once("Test", message);
        assert!(has_warned("Test", message));
        assert_eq!(
            warned()
                .as_ref()
                .map_or(0, |set| set.iter().filter(|k| k.ends_with(message)).count()),
            1
        );
    }

    #[test]
    fn test_component_is_part_of_key() {
        set_muted(true);
        let message = "same text, different component";
        warn_once("Alpha", message);
        assert!(has_warned("Alpha", message));
        assert!(!has_warned("Beta", message));
    }
}
