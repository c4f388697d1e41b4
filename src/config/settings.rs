//! User settings from `settings.conf`, with environment overrides.

use std::env;
use std::fs;

use crate::dialer::FailurePolicy;
use crate::state::PageSize;

/// Environment variable carrying the backend base URL.
pub const ENV_BACKEND_URL: &str = "CREWDESK_BACKEND_URL";
/// Environment variable carrying the backend API key.
pub const ENV_BACKEND_KEY: &str = "CREWDESK_BACKEND_KEY";
/// Environment variable forcing offline mode when set truthy.
pub const ENV_OFFLINE: &str = "CREWDESK_OFFLINE";

/// Resolved crewdesk configuration.
///
/// Built in three layers: defaults, then `settings.conf`, then environment
/// variables. Credentials usually arrive through the environment so the
/// config file can be shared without them.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the hosted record backend.
    pub backend_url: Option<String>,
    /// API key sent with every backend request.
    pub backend_key: Option<String>,
    /// Rows per page when a table first opens.
    pub page_size: PageSize,
    /// Per-call delay of the simulated caller, in milliseconds.
    pub call_delay_ms: u64,
    /// Upper bound on calls in flight during a batch; 1 means sequential.
    pub call_max_in_flight: usize,
    /// Batch behavior when a single call fails.
    pub call_failure_policy: FailurePolicy,
    /// Skip the live backend entirely and serve local records.
    pub offline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            backend_url: None,
            backend_key: None,
            page_size: PageSize::Ten,
            call_delay_ms: 500,
            call_max_in_flight: 1,
            call_failure_policy: FailurePolicy::SkipAndReport,
            offline: false,
        }
    }
}

/// Load settings from `settings.conf` and the environment.
///
/// Falls back to `Settings::default()` for anything missing or invalid;
/// a broken config never stops startup.
pub fn settings() -> Settings {
    let mut out = Settings::default();
    if let Some(path) = super::paths::resolve_settings_path()
        && let Ok(content) = fs::read_to_string(&path)
    {
        apply_conf(&mut out, &content);
    }
    apply_env(&mut out);
    out
}

/// Fold one config file's `key = value` lines into `out`.
///
/// Unknown keys and unparsable values are skipped; keys fold case and
/// accept `.`, `-`, and spaces as underscores.
fn apply_conf(out: &mut Settings, content: &str) {
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }
        let Some((raw_key, raw_val)) = trimmed.split_once('=') else {
            continue;
        };
        let key = raw_key.trim().to_lowercase().replace(['.', '-', ' '], "_");
        let val = strip_inline_comment(raw_val.trim());
        match key.as_str() {
            "backend_url" => {
                if !val.is_empty() {
                    out.backend_url = Some(val.to_string());
                }
            }
            "backend_key" => {
                if !val.is_empty() {
                    out.backend_key = Some(val.to_string());
                }
            }
            "page_size" | "rows_per_page" => {
                if let Ok(rows) = val.parse::<usize>()
                    && let Some(size) = PageSize::from_rows(rows)
                {
                    out.page_size = size;
                }
            }
            "call_delay_ms" => {
                if let Ok(ms) = val.parse::<u64>() {
                    out.call_delay_ms = ms;
                }
            }
            "call_max_in_flight" => {
                if let Ok(n) = val.parse::<usize>() {
                    out.call_max_in_flight = n.max(1);
                }
            }
            "call_failure_policy" => {
                if let Some(policy) = FailurePolicy::from_config_key(val) {
                    out.call_failure_policy = policy;
                }
            }
            "offline" => {
                out.offline = truthy(val);
            }
            _ => {}
        }
    }
}

/// Fold environment overrides into `out`.
fn apply_env(out: &mut Settings) {
    if let Ok(url) = env::var(ENV_BACKEND_URL)
        && !url.trim().is_empty()
    {
        out.backend_url = Some(url.trim().to_string());
    }
    if let Ok(key) = env::var(ENV_BACKEND_KEY)
        && !key.trim().is_empty()
    {
        out.backend_key = Some(key.trim().to_string());
    }
    if let Ok(flag) = env::var(ENV_OFFLINE)
        && truthy(flag.trim())
    {
        out.offline = true;
    }
}

fn truthy(val: &str) -> bool {
    let lv = val.to_ascii_lowercase();
    lv == "true" || lv == "1" || lv == "yes" || lv == "on"
}

/// Cut an inline comment off a value.
///
/// Only markers preceded by whitespace count, so `https://…` URLs and keys
/// containing `#` survive unharmed.
fn strip_inline_comment(s: &str) -> &str {
    for marker in ["//", "#"] {
        if let Some(i) = s.find(marker)
            && (i == 0 || s[..i].ends_with(char::is_whitespace))
        {
            return s[..i].trim();
        }
    }
    s.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Defaults match the documented startup behavior
    ///
    /// - Input: `Settings::default()`
    /// - Output: No credentials, 10 rows, 500 ms delay, sequential batches
    fn defaults_are_sane() {
        let s = Settings::default();
        assert!(s.backend_url.is_none());
        assert!(s.backend_key.is_none());
        assert_eq!(s.page_size, PageSize::Ten);
        assert_eq!(s.call_delay_ms, 500);
        assert_eq!(s.call_max_in_flight, 1);
        assert_eq!(s.call_failure_policy, FailurePolicy::SkipAndReport);
        assert!(!s.offline);
    }

    #[test]
    /// What: A full config file overrides every default
    ///
    /// - Input: Conf text with every supported key, comments, and aliases
    /// - Output: All fields updated; URL survives its `//`
    fn conf_overrides_defaults() {
        let content = "\
# crewdesk settings
backend_url = https://crm.example.com # prod
backend_key = service-key-123
rows-per-page = 25
call_delay_ms = 50
call_max_in_flight = 3
call_failure_policy = abort
offline = no
";
        let mut s = Settings::default();
        apply_conf(&mut s, content);
        assert_eq!(s.backend_url.as_deref(), Some("https://crm.example.com"));
        assert_eq!(s.backend_key.as_deref(), Some("service-key-123"));
        assert_eq!(s.page_size, PageSize::TwentyFive);
        assert_eq!(s.call_delay_ms, 50);
        assert_eq!(s.call_max_in_flight, 3);
        assert_eq!(s.call_failure_policy, FailurePolicy::AbortOnFirst);
        assert!(!s.offline);
    }

    #[test]
    /// What: Invalid values fall back instead of breaking the load
    ///
    /// - Input: Unsupported page size, garbage delay, unknown policy/key
    /// - Output: Defaults retained for every bad field
    fn invalid_values_are_skipped() {
        let content = "\
page_size = 13
call_delay_ms = fast
call_failure_policy = retry
call_max_in_flight = 0
unknown_key = whatever
";
        let mut s = Settings::default();
        apply_conf(&mut s, content);
        assert_eq!(s.page_size, PageSize::Ten);
        assert_eq!(s.call_delay_ms, 500);
        assert_eq!(s.call_failure_policy, FailurePolicy::SkipAndReport);
        assert_eq!(s.call_max_in_flight, 1);
    }

    #[test]
    /// What: Truthy parsing accepts the usual spellings
    ///
    /// - Input: true/1/yes/on and some falsy strings
    /// - Output: Truthy for the former, falsy for the latter
    fn truthy_spellings() {
        for yes in ["true", "1", "yes", "on", "TRUE", "On"] {
            assert!(truthy(yes), "{yes}");
        }
        for no in ["false", "0", "off", "", "maybe"] {
            assert!(!truthy(no), "{no}");
        }
    }

    #[test]
    /// What: Inline comments are cut only at whitespace boundaries
    ///
    /// - Input: URL with scheme slashes, value with trailing `#` comment
    /// - Output: URL intact; comments after whitespace removed
    fn inline_comments_respect_urls() {
        assert_eq!(
            strip_inline_comment("https://crm.example.com/api"),
            "https://crm.example.com/api"
        );
        assert_eq!(strip_inline_comment("value # note"), "value");
        assert_eq!(strip_inline_comment("value // note"), "value");
        assert_eq!(strip_inline_comment("plain"), "plain");
    }

    #[test]
    /// What: Settings load end to end from a real settings.conf
    ///
    /// - Input: Temp HOME holding `.config/crewdesk/settings.conf`
    /// - Output: `settings()` picks the file up and applies its values
    fn settings_load_from_disk() {
        let _guard = crate::config::test_mutex().lock().unwrap();
        let orig_home = std::env::var_os("HOME");
        let orig_url = std::env::var_os(ENV_BACKEND_URL);
        let orig_key = std::env::var_os(ENV_BACKEND_KEY);
        let home = tempfile::tempdir().expect("Temp dir is creatable");
        let conf_dir = home.path().join(".config").join("crewdesk");
        std::fs::create_dir_all(&conf_dir).expect("Config dir is creatable");
        std::fs::write(
            conf_dir.join("settings.conf"),
            "page_size = 50\ncall_delay_ms = 10\n",
        )
        .expect("Settings file is writable");
        unsafe {
            std::env::set_var("HOME", home.path());
            std::env::remove_var(ENV_BACKEND_URL);
            std::env::remove_var(ENV_BACKEND_KEY);
        }
        let s = settings();
        assert_eq!(s.page_size, PageSize::Fifty);
        assert_eq!(s.call_delay_ms, 10);
        assert!(s.backend_url.is_none());
        unsafe {
            match orig_home {
                Some(v) => std::env::set_var("HOME", v),
                None => std::env::remove_var("HOME"),
            }
            if let Some(v) = orig_url {
                std::env::set_var(ENV_BACKEND_URL, v);
            }
            if let Some(v) = orig_key {
                std::env::set_var(ENV_BACKEND_KEY, v);
            }
        }
    }

    #[test]
    /// What: Environment variables override file values
    ///
    /// - Input: Conf-set URL, env-set URL and offline flag
    /// - Output: Env wins for the URL; offline turns on
    fn env_overrides_file() {
        let _guard = crate::config::test_mutex().lock().unwrap();
        let orig_url = std::env::var_os(ENV_BACKEND_URL);
        let orig_offline = std::env::var_os(ENV_OFFLINE);
        unsafe {
            std::env::set_var(ENV_BACKEND_URL, "https://env.example.com");
            std::env::set_var(ENV_OFFLINE, "1");
        }
        let mut s = Settings::default();
        apply_conf(&mut s, "backend_url = https://file.example.com\n");
        apply_env(&mut s);
        assert_eq!(s.backend_url.as_deref(), Some("https://env.example.com"));
        assert!(s.offline);
        unsafe {
            match orig_url {
                Some(v) => std::env::set_var(ENV_BACKEND_URL, v),
                None => std::env::remove_var(ENV_BACKEND_URL),
            }
            match orig_offline {
                Some(v) => std::env::set_var(ENV_OFFLINE, v),
                None => std::env::remove_var(ENV_OFFLINE),
            }
        }
    }
}
