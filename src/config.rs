// Process-wide configuration: where the scoring server lives, where the
// local marker folder is kept and how long a request may take.
//
// Values come from the environment with sensible defaults so the binary
// works out of the box; tests build a `Config` directly and point
// `state_dir` at a temporary directory.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.narukoshin.me";
pub const DEFAULT_STATE_DIR: &str = ".narukeFolder";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_URL_ENV: &str = "NARUKEN_API_URL";
pub const STATE_DIR_ENV: &str = "NARUKEN_STATE_DIR";

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the scoring server, without a trailing slash.
    pub api_url: String,
    /// Marker folder holding `settings.json`. Relative paths resolve
    /// against the current working directory.
    pub state_dir: PathBuf,
    pub timeout: Duration,
}

impl Config {
    /// Read `NARUKEN_API_URL` and `NARUKEN_STATE_DIR`, falling back to the
    /// competition server and `.narukeFolder`.
    pub fn from_env() -> Self {
        let api_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.into());
        let state_dir = std::env::var(STATE_DIR_ENV).unwrap_or_else(|_| DEFAULT_STATE_DIR.into());
        Config::new(api_url, state_dir)
    }

    pub fn new(api_url: impl Into<String>, state_dir: impl Into<PathBuf>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Config {
            api_url,
            state_dir: state_dir.into(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DEFAULT_API_URL, DEFAULT_STATE_DIR)
    }
}
