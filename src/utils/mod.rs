pub mod config;
pub mod errors;

pub use config::{LoggingConfig, StatsConfig, UtilsConfig};
pub use errors::{Result, UtilError};

pub(crate) fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
