use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{MarketflowError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// http server config
    #[serde(default)]
    pub server: ServerConfig,
    /// store config
    #[serde(default)]
    pub store: StoreConfig,
    /// executor config
    #[serde(default)]
    pub executor: ExecutorConfig,
    /// stage runner config
    #[serde(default)]
    pub runner: RunnerConfig,
    /// number of async worker threads, defaults to 16
    #[serde(default = "default_worker_threads")]
    pub async_worker_thread_number: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// store type
    #[serde(default)]
    pub store_type: StoreType,
    /// file store config
    pub fs: Option<FsConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    #[default]
    Mem,
    Fs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FsConfig {
    /// directory holding one JSON snapshot per workflow
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutorConfig {
    /// multiplier applied to nominal stage durations by the mock runner
    /// (1.0 = real time)
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    /// per-stage timeout in milliseconds; a timed out stage counts as failed
    pub stage_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunnerConfig {
    /// runner mode
    #[serde(default)]
    pub mode: RunnerMode,
    /// http runner config
    pub http: Option<HttpRunnerConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunnerMode {
    #[default]
    Mock,
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpRunnerConfig {
    /// content-generation endpoint stages are POSTed to
    pub endpoint: String,
    /// request timeout in milliseconds
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_worker_threads() -> u16 {
    16
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8710
}

fn default_time_scale() -> f64 {
    0.001
}

fn default_http_timeout_ms() -> u64 {
    30_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            executor: ExecutorConfig::default(),
            runner: RunnerConfig::default(),
            async_worker_thread_number: default_worker_threads(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
            stage_timeout_ms: None,
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref()).map_err(|e| MarketflowError::Config(format!("failed to load config file {:?}: {}", path.as_ref(), e)))?;

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        toml::from_str::<Config>(toml_str).map_err(|e| MarketflowError::Config(format!("failed to parse the toml str: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Config, RunnerMode, StoreType};

    #[test]
    fn test_config_deserialize() {
        let toml_str = r#"
        async_worker_thread_number = 10

        [server]
        host = "0.0.0.0"
        port = 9000

        [store]
        store_type = "fs"

        [store.fs]
        data_dir = "/var/lib/marketflow/workflows"

        [executor]
        time_scale = 0.01
        stage_timeout_ms = 5000

        [runner]
        mode = "http"

        [runner.http]
        endpoint = "http://localhost:9200/generate"
        "#;
        let config = Config::load_from_str(toml_str).unwrap();
        assert_eq!(config.async_worker_thread_number, 10);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.store.store_type, StoreType::Fs);
        assert_eq!(config.store.fs.unwrap().data_dir.to_str().unwrap(), "/var/lib/marketflow/workflows");
        assert_eq!(config.executor.stage_timeout_ms, Some(5000));
        assert_eq!(config.runner.mode, RunnerMode::Http);
        assert_eq!(config.runner.http.unwrap().timeout_ms, 30_000);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::load_from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.store.store_type, StoreType::Mem);
        assert_eq!(config.runner.mode, RunnerMode::Mock);
        assert!(config.executor.stage_timeout_ms.is_none());
    }

    #[test]
    fn test_bad_toml_is_a_config_error() {
        let err = Config::load_from_str("store = 12").unwrap_err();
        assert_eq!(err.as_ref(), "config");
    }
}
