//! Config and log directory resolution.

use std::env;
use std::path::{Path, PathBuf};

/// Determine the configuration file path for crewdesk's settings.
///
/// Checks `$HOME/.config/crewdesk/settings.conf` first, then the same file
/// under `$XDG_CONFIG_HOME`; returns the first that exists.
pub(crate) fn resolve_settings_path() -> Option<PathBuf> {
    let home = env::var("HOME").ok();
    let xdg_config = env::var("XDG_CONFIG_HOME").ok();
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(h) = home.as_deref() {
        let base = Path::new(h).join(".config").join("crewdesk");
        candidates.push(base.join("settings.conf"));
    }
    if let Some(xdg) = xdg_config.as_deref() {
        let x = Path::new(xdg).join("crewdesk");
        candidates.push(x.join("settings.conf"));
    }
    candidates.into_iter().find(|p| p.is_file())
}

/// Resolve an XDG base directory from environment or default to `$HOME` + segments.
///
/// Inputs:
/// - `var`: Environment variable to check (e.g., `XDG_CONFIG_HOME`).
/// - `home_default`: Fallback path segments relative to `$HOME` if `var` is unset/empty.
///
/// Output: Resolved base directory path.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(p) = env::var(var)
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let mut base = PathBuf::from(home);
    for seg in home_default {
        base = base.join(seg);
    }
    base
}

/// Return `$HOME/.config/crewdesk`, ensuring it exists.
///
/// Output: `Some(PathBuf)` when HOME is set and the directory can be
/// created; `None` otherwise.
fn home_config_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        let dir = Path::new(&home).join(".config").join("crewdesk");
        if std::fs::create_dir_all(&dir).is_ok() {
            return Some(dir);
        }
    }
    None
}

/// XDG config directory for crewdesk (ensured to exist)
pub fn config_dir() -> PathBuf {
    // Prefer HOME ~/.config/crewdesk first
    if let Some(dir) = home_config_dir() {
        return dir;
    }
    // Fallback: use XDG_CONFIG_HOME (or default to ~/.config) and ensure
    let base = xdg_base_dir("XDG_CONFIG_HOME", &[".config"]);
    let dir = base.join("crewdesk");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Logs directory under config: "$HOME/.config/crewdesk/logs" (ensured to exist)
pub fn logs_dir() -> PathBuf {
    let base = config_dir();
    let dir = base.join("logs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

#[cfg(test)]
mod tests {
    #[test]
    fn paths_config_and_logs_under_home() {
        let _guard = crate::config::test_mutex().lock().unwrap();
        let orig_home = std::env::var_os("HOME");
        let base = std::env::temp_dir().join(format!(
            "crewdesk_test_paths_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let _ = std::fs::create_dir_all(&base);
        unsafe { std::env::set_var("HOME", base.display().to_string()) };
        let cfg = super::config_dir();
        let logs = super::logs_dir();
        assert!(cfg.ends_with("crewdesk"));
        assert!(logs.ends_with("logs"));
        unsafe {
            if let Some(v) = orig_home {
                std::env::set_var("HOME", v);
            } else {
                std::env::remove_var("HOME");
            }
        }
    }
}
