use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Public Moedict API host.
pub const DEFAULT_DICTIONARY_URL: &str = "https://www.moedict.tw";

/// Environment variable overriding [`ZhuyinConfig::dictionary_url`].
pub const DICTIONARY_URL_ENV: &str = "ZHUYIN_DICTIONARY_URL";

/// Service configuration that extends the base `Config` from core.
///
/// This configuration includes:
/// - All generic options from `zhuyin_core::Config` (flattened via serde)
/// - The dictionary endpoint and request timeout
/// - Response caching for successful lookups
/// - HTTP server binding
///
/// # Example
///
/// ```rust
/// use libzhuyin::ZhuyinConfig;
///
/// let config = ZhuyinConfig::from_toml_str("timeout_ms = 2000").unwrap();
/// assert_eq!(config.timeout_ms, 2000);
/// assert_eq!(config.cache_ttl_secs, 3600);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ZhuyinConfig {
    /// Base configuration fields (data file locations)
    #[serde(flatten)]
    pub base: zhuyin_core::Config,

    /// Dictionary service base URL; requests go to `{url}/a/{word}.json`
    pub dictionary_url: String,

    /// Per-request timeout for dictionary lookups, in milliseconds
    pub timeout_ms: u64,

    /// How long a successful lookup may be reused. 0 disables caching.
    pub cache_ttl_secs: u64,

    /// Maximum number of cached lookups. 0 disables caching.
    pub cache_capacity: usize,

    /// Address the HTTP server binds to
    pub bind: String,

    /// Request handling threads for the HTTP server
    pub workers: usize,
}

impl Default for ZhuyinConfig {
    fn default() -> Self {
        Self {
            base: zhuyin_core::Config::default(),
            dictionary_url: DEFAULT_DICTIONARY_URL.to_string(),
            timeout_ms: 5000,
            // one hour
            cache_ttl_secs: 60 * 60,
            cache_capacity: 512,
            bind: "127.0.0.1:8787".to_string(),
            workers: 4,
        }
    }
}

impl ZhuyinConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Apply overrides from the environment.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(DICTIONARY_URL_ENV) {
            if !url.trim().is_empty() {
                self.dictionary_url = url.trim().to_string();
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Convert this config into the base config.
    pub fn into_base(self) -> zhuyin_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &zhuyin_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut zhuyin_core::Config {
        &mut self.base
    }
}
