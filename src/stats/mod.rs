//! Runtime statistics collectors.
//!
//! Both collectors keep their maps behind an async mutex and run one
//! background task that periodically writes a JSON report into the
//! configured output directory.

mod pool;
pub mod sender_stats;
pub mod serv_stats;

pub use sender_stats::{SenderStats, SenderStatsNode, SenderStatsReport};
pub use serv_stats::{MsgContext, ServStats, ServStatsMsg, ServStatsMsgNode, ServStatsReport};

use crate::utils::Result;
use serde::Serialize;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Keeps the largest `max_nodes` samples once the list grows past twice that
/// size. Returns the samples that were dropped.
pub(crate) fn trim_top_n<T, F>(nodes: &mut Vec<T>, max_nodes: usize, mut cmp: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if nodes.len() <= max_nodes.saturating_mul(2) {
        return Vec::new();
    }

    nodes.sort_by(|a, b| cmp(b, a));
    nodes.split_off(max_nodes)
}

pub(crate) async fn write_report<T: Serialize>(
    dir: &Path,
    file_name: &str,
    report: &T,
) -> Result<PathBuf> {
    let content = serde_json::to_vec(report)?;
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(file_name);
    tokio::fs::write(&path, content).await?;

    tracing::debug!(path = %path.display(), "stats report written");
    Ok(path)
}

pub(crate) fn is_zero_f64(v: &f64) -> bool {
    *v == 0.0
}

pub(crate) fn is_zero_u64(v: &u64) -> bool {
    *v == 0
}

pub(crate) fn is_zero_usize(v: &usize) -> bool {
    *v == 0
}
