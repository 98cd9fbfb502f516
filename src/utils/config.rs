use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilsConfig {
    pub logging: LoggingConfig,
    pub stats: StatsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub app_name: String,
    pub level: String,
    pub console: bool,
    pub log_path: PathBuf,
    /// Daily log files kept on disk. Zero keeps every file.
    pub max_log_files: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub max_nodes: usize,
    pub chan_size: usize,
    pub output_interval_secs: u64,
    /// Contexts started longer ago than this are dropped at the next
    /// report. Zero keeps them forever.
    pub pending_timeout_secs: u64,
    pub path_output: PathBuf,
    pub prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: "app".to_string(),
            level: "info".to_string(),
            console: true,
            log_path: PathBuf::from("./logs"),
            max_log_files: 30,
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            max_nodes: 100,
            chan_size: 1024,
            output_interval_secs: 60,
            pending_timeout_secs: 600,
            path_output: PathBuf::from("./stats"),
            prefix: "sender".to_string(),
        }
    }
}

impl StatsConfig {
    pub fn output_interval(&self) -> Duration {
        Duration::from_secs(self.output_interval_secs.max(1))
    }

    pub fn pending_timeout(&self) -> Option<Duration> {
        (self.pending_timeout_secs > 0).then(|| Duration::from_secs(self.pending_timeout_secs))
    }
}

impl UtilsConfig {
    pub fn load_from_file(path: &str) -> crate::utils::errors::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::utils::errors::UtilError::Config(e.to_string()))?;
        toml::from_str(&content).map_err(|e| crate::utils::errors::UtilError::Config(e.to_string()))
    }

    pub fn load_or_default(path: Option<&str>) -> Self {
        if let Some(p) = path {
            Self::load_from_file(p).unwrap_or_default()
        } else {
            Self::default()
        }
    }
}
