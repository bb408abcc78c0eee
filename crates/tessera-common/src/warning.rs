//! Tessera warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the HTML parser, the selector engine, and the inliner to report
//! input they recovered from or could not interpret.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Whether warnings are written to stderr at all.
static ENABLED: AtomicBool = AtomicBool::new(true);

/// Format the deduplication key for a component/message pair.
fn key_for(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Warn about recovered input or unsupported syntax (prints once per unique message)
///
/// The message is recorded even while output is disabled, so
/// [`has_warned`] keeps working for callers that silence stderr.
///
/// # Example
/// ```ignore
/// warn_once("CSS", "unsupported selector 'a > b'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = key_for(component, message);
    // A poisoned lock only means another thread panicked mid-insert; the set
    // itself is still usable.
    let mut guard = WARNED.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let is_new = guard.get_or_insert_with(HashSet::new).insert(key);
    drop(guard);

    if is_new && ENABLED.load(Ordering::Relaxed) {
        eprintln!("{}", format!("[Tessera {component}] ⚠ {message}").yellow());
    }
}

/// Returns true if `warn_once` has already recorded this component/message pair.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    let key = key_for(component, message);
    let guard = WARNED.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    guard.as_ref().is_some_and(|set| set.contains(&key))
}

/// Turn stderr output on or off. Warnings are still recorded while disabled.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

/// Clear all recorded warnings (call before processing an unrelated document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
