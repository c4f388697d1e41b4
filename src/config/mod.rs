//! Configuration for crewdesk: settings file, environment overrides, and
//! filesystem paths.

/// Path resolution for config and log directories.
mod paths;
/// Settings access and parsing.
mod settings;

#[allow(unused_imports)]
pub use paths::{config_dir, logs_dir};
#[allow(unused_imports)]
pub use settings::{ENV_BACKEND_KEY, ENV_BACKEND_URL, ENV_OFFLINE, Settings, settings};

#[cfg(test)]
static TEST_MUTEX: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();

#[cfg(test)]
/// What: Provide a process-wide mutex to serialize environment-mutating tests in this module.
///
/// Inputs:
/// - None
///
/// Output:
/// - Shared reference to a lazily-initialized `Mutex<()>`.
///
/// Details:
/// - Uses `OnceLock` to ensure the mutex is constructed exactly once per process.
/// - Callers should lock the mutex to guard environment-variable or disk state changes.
pub(crate) fn test_mutex() -> &'static std::sync::Mutex<()> {
    TEST_MUTEX.get_or_init(|| std::sync::Mutex::new(()))
}
