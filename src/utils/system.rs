//! Environment and terminal helpers

use std::env;
use std::io::IsTerminal;

/// Get environment variable value
///
/// # Returns
///
/// The trimmed value of the environment variable, or an empty string if it is
/// unset or not valid unicode
pub fn get_env(name: &str) -> String {
    env::var(name)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Whether ANSI colours should be written to stdout.
///
/// Honours the `NO_COLOR` convention and falls back to plain output when
/// stdout is not a terminal.
pub fn stdout_supports_color() -> bool {
    if env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    std::io::stdout().is_terminal()
}
