use super::{is_zero_u64, trim_top_n, write_report};
use crate::utils::{unix_now, Result, StatsConfig, UtilError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderStatsNode {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub total_bytes: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub total_times: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub max_bytes: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub min_bytes: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<u64>,
}

impl SenderStatsNode {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn push(&mut self, bytes: u64, max_nodes: usize) {
        if self.total_times == 0 || bytes < self.min_bytes {
            self.min_bytes = bytes;
        }
        self.max_bytes = self.max_bytes.max(bytes);
        self.total_times += 1;
        self.total_bytes += bytes;

        self.nodes.push(bytes);
        trim_top_n(&mut self.nodes, max_nodes, |a, b| a.cmp(b));
    }

    fn sort(&mut self) {
        self.nodes.sort_unstable_by(|a, b| b.cmp(a));
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderStatsReport {
    #[serde(rename = "mapMsgs", skip_serializing_if = "BTreeMap::is_empty")]
    pub map_nodes: BTreeMap<String, SenderStatsNode>,
}

/// Byte counts per sender name, written to
/// `<path_output>/<prefix>.<unix>.json` every output interval.
pub struct SenderStats {
    nodes: Arc<Mutex<BTreeMap<String, SenderStatsNode>>>,
    max_nodes: usize,
    period: Duration,
    path_output: PathBuf,
    prefix: String,
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SenderStats {
    pub fn new(config: &StatsConfig) -> Self {
        Self {
            nodes: Arc::new(Mutex::new(BTreeMap::new())),
            max_nodes: config.max_nodes,
            period: config.output_interval(),
            path_output: config.path_output.clone(),
            prefix: config.prefix.clone(),
            stop_tx: None,
            handle: None,
        }
    }

    pub async fn push(&self, name: &str, bytes: u64) {
        let mut nodes = self.nodes.lock().await;
        nodes
            .entry(name.to_string())
            .or_insert_with(|| SenderStatsNode::new(name))
            .push(bytes, self.max_nodes);
    }

    /// Spawns the periodic output loop. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        if self.stop_tx.is_some() {
            warn!("SenderStats::start: already running");
            return;
        }

        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::spawn(run_loop(
            self.nodes.clone(),
            rx,
            self.period,
            self.path_output.clone(),
            self.prefix.clone(),
        ));

        self.stop_tx = Some(tx);
        self.handle = Some(handle);
    }

    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }

    pub async fn stop(&mut self) -> Result<()> {
        let tx = self.stop_tx.take().ok_or(UtilError::ChannelClosed)?;
        if tx.send(()).await.is_err() {
            warn!("SenderStats::stop: loop already gone");
        }

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "SenderStats::stop: loop task failed");
            }
        }

        Ok(())
    }

    /// Copy of the current counters with every node list sorted descending.
    pub async fn snapshot(&self) -> SenderStatsReport {
        snapshot(&self.nodes).await
    }

    pub async fn output(&self) -> Result<PathBuf> {
        let report = self.snapshot().await;
        write_report(&self.path_output, &file_name(&self.prefix), &report).await
    }
}

async fn snapshot(nodes: &Mutex<BTreeMap<String, SenderStatsNode>>) -> SenderStatsReport {
    let mut nodes = nodes.lock().await;
    for node in nodes.values_mut() {
        node.sort();
    }

    SenderStatsReport {
        map_nodes: nodes.clone(),
    }
}

fn file_name(prefix: &str) -> String {
    format!("{}.{}.json", prefix, unix_now())
}

async fn run_loop(
    nodes: Arc<Mutex<BTreeMap<String, SenderStatsNode>>>,
    mut rx: mpsc::Receiver<()>,
    period: Duration,
    path_output: PathBuf,
    prefix: String,
) {
    let mut ticker = interval(period);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = rx.recv() => {
                info!("SenderStats: main loop stopped");
                break;
            }
            _ = ticker.tick() => write_snapshot(&nodes, &path_output, &prefix).await,
        }
    }
}

async fn write_snapshot(
    nodes: &Mutex<BTreeMap<String, SenderStatsNode>>,
    dir: &Path,
    prefix: &str,
) {
    let report = snapshot(nodes).await;
    if let Err(e) = write_report(dir, &file_name(prefix), &report).await {
        warn!(error = %e, "SenderStats: failed to write report");
    }
}
