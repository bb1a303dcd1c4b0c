use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional settings read from `config.toml`. Command-line flags win over
/// anything set here.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Ark region used to build the endpoint URL (e.g. "cn-beijing")
    pub region: Option<String>,
    /// Whole-request timeout in seconds
    pub timeout_secs: Option<u64>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Base URL template; `{region}` is replaced with the active region
    pub base_url: Option<String>,
    /// Prefix printed in front of assistant replies
    pub assistant_label: Option<String>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
