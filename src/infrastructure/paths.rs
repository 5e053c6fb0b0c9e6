//! Path helpers for configuration and log locations.
//!
//! Configuration values may use `~` for the user's home directory. Logs go
//! to the XDG state directory when one can be determined.

use std::path::PathBuf;

/// Returns the directory the menu keeps its state in, such as logs.
///
/// Resolves to `$XDG_STATE_HOME/lcdmenu`, falling back to
/// `~/.local/state/lcdmenu`, and to `./lcdmenu` when no home directory is
/// known (bare device images often run without one).
#[must_use]
pub fn get_state_dir() -> PathBuf {
    state_dir_from(
        std::env::var_os("XDG_STATE_HOME").map(PathBuf::from),
        home_dir(),
    )
}

fn state_dir_from(xdg_state_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    xdg_state_home
        .filter(|path| path.is_absolute())
        .or_else(|| home.map(|home| home.join(".local").join("state")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lcdmenu")
}

/// Default location of the log file.
#[must_use]
pub fn default_log_file() -> PathBuf {
    get_state_dir().join("lcdmenu.log")
}

/// Resolves a `log_file` setting: the word `default` names
/// [`default_log_file`], anything else is a path with `~` expanded.
///
/// # Examples
///
/// ```
/// use lcdmenu::infrastructure::{default_log_file, resolve_log_file};
///
/// assert_eq!(resolve_log_file("default"), default_log_file());
/// assert_eq!(resolve_log_file("/tmp/menu.log").to_str(), Some("/tmp/menu.log"));
/// ```
#[must_use]
pub fn resolve_log_file(value: &str) -> PathBuf {
    match value.trim() {
        "default" => default_log_file(),
        path => expand_tilde(path),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a tilde, and every path when no home directory is known,
/// come back unchanged.
///
/// # Examples
///
/// ```
/// use lcdmenu::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/etc/lcdmenu.toml").to_str(), Some("/etc/lcdmenu.toml"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, home_dir())
}

fn expand_tilde_with(path: &str, home: Option<PathBuf>) -> PathBuf {
    match (path.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}
