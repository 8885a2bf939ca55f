//! Application configuration.
//!
//! Settings come from environment variables, falling back to defaults:
//!
//! | variable               | meaning                                    |
//! |------------------------|--------------------------------------------|
//! | `METRO_DATA_URL`       | dataset URL                                |
//! | `METRO_DATA_FILE`      | local dataset file (skips download)        |
//! | `METRO_CACHE_PATH`     | dataset cache file, `off` disables caching |
//! | `METRO_CACHE_TTL_SECS` | dataset cache lifetime                     |
//! | `METRO_BIND_ADDR`      | web server address                         |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::cache::ResultCacheConfig;
use crate::dataset::{DatasetCacheConfig, DatasetClientConfig, DatasetConfig};

/// Default web server address.
pub const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
    3000,
);

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub bind_addr: SocketAddr,
    pub results: ResultCacheConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig {
                client: DatasetClientConfig::default(),
                cache: Some(DatasetCacheConfig::default()),
                local_file: None,
            },
            bind_addr: DEFAULT_BIND_ADDR,
            results: ResultCacheConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps variable names to values.
    ///
    /// Unparseable values are logged and replaced by their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("METRO_DATA_URL") {
            config.dataset.client.url = url;
        }

        config.dataset.local_file = lookup("METRO_DATA_FILE").map(PathBuf::from);

        match lookup("METRO_CACHE_PATH").as_deref() {
            Some("off") => config.dataset.cache = None,
            Some(path) => config.dataset.cache = Some(DatasetCacheConfig::new(path)),
            None => {}
        }

        if let Some(raw) = lookup("METRO_CACHE_TTL_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => {
                    if let Some(cache) = config.dataset.cache.take() {
                        config.dataset.cache = Some(cache.with_ttl(Duration::from_secs(secs)));
                    }
                }
                Err(_) => warn!(value = %raw, "Ignoring invalid METRO_CACHE_TTL_SECS"),
            }
        }

        if let Some(raw) = lookup("METRO_BIND_ADDR") {
            match raw.parse::<SocketAddr>() {
                Ok(addr) => config.bind_addr = addr,
                Err(_) => warn!(value = %raw, "Ignoring invalid METRO_BIND_ADDR"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DEFAULT_DATA_URL;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[]));

        assert_eq!(config.dataset.client.url, DEFAULT_DATA_URL);
        assert!(config.dataset.local_file.is_none());
        assert_eq!(
            config.dataset.cache.unwrap().path,
            PathBuf::from("farecalc_cache.json")
        );
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn overrides_from_environment() {
        let config = AppConfig::from_lookup(lookup(&[
            ("METRO_DATA_URL", "http://localhost/data.json"),
            ("METRO_DATA_FILE", "/data/farecalc.json"),
            ("METRO_CACHE_PATH", "/tmp/cache.json"),
            ("METRO_CACHE_TTL_SECS", "60"),
            ("METRO_BIND_ADDR", "0.0.0.0:8080"),
        ]));

        assert_eq!(config.dataset.client.url, "http://localhost/data.json");
        assert_eq!(
            config.dataset.local_file,
            Some(PathBuf::from("/data/farecalc.json"))
        );
        let cache = config.dataset.cache.unwrap();
        assert_eq!(cache.path, PathBuf::from("/tmp/cache.json"));
        assert_eq!(cache.ttl, Duration::from_secs(60));
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn cache_can_be_disabled() {
        let config = AppConfig::from_lookup(lookup(&[("METRO_CACHE_PATH", "off")]));
        assert!(config.dataset.cache.is_none());
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("METRO_CACHE_TTL_SECS", "soon"),
            ("METRO_BIND_ADDR", "not-an-addr"),
        ]));

        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(
            config.dataset.cache.unwrap().ttl,
            DatasetCacheConfig::default().ttl
        );
    }
}
