use super::pool::NodePool;
use super::{is_zero_f64, is_zero_u64, is_zero_usize, trim_top_n, write_report};
use crate::utils::{unix_now, Result, StatsConfig, UtilError};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant};
use tracing::{error, info, warn};

static NEXT_CTX_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one in-flight message. Every call to `new` yields a distinct id,
/// so two requests for the same message kind are timed separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MsgContext {
    id: u64,
    name: String,
}

impl MsgContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NEXT_CTX_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServStatsMsgNode {
    #[serde(skip)]
    pub start: Option<Instant>,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub second_off: f64,
}

/// Aggregated timings for one message kind. Times are in seconds.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServStatsMsg {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub total_time: f64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub total_times: u64,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub max_time: f64,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub min_time: f64,
    #[serde(skip_serializing_if = "is_zero_usize")]
    pub max_parallels: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Box<ServStatsMsgNode>>,
    #[serde(
        rename = "noEndNodes",
        serialize_with = "serialize_pending",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pending: HashMap<u64, Box<ServStatsMsgNode>>,
}

fn serialize_pending<S: Serializer>(
    pending: &HashMap<u64, Box<ServStatsMsgNode>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(pending.len() as u64)
}

type NodeBox = Box<ServStatsMsgNode>;

impl ServStatsMsg {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Contexts started but not yet ended.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// A second start for the same context replaces the pending entry and
    /// reports `DuplicateMsgCtx`.
    fn start_msg(
        &mut self,
        ctx: &MsgContext,
        at: Instant,
        pool: &mut NodePool<NodeBox>,
    ) -> Result<()> {
        let mut node = pool.acquire();
        node.start = Some(at);
        node.second_off = 0.0;

        let replaced = self.pending.insert(ctx.id, node);
        self.max_parallels = self.max_parallels.max(self.pending.len());

        match replaced {
            Some(old) => {
                pool.release(old);
                Err(UtilError::DuplicateMsgCtx)
            }
            None => Ok(()),
        }
    }

    /// Drops contexts started more than `timeout` before `now`. Returns how
    /// many were dropped.
    fn evict_stale(
        &mut self,
        now: Instant,
        timeout: Duration,
        pool: &mut NodePool<NodeBox>,
    ) -> usize {
        let stale: Vec<u64> = self
            .pending
            .iter()
            .filter(|(_, node)| {
                node.start
                    .map_or(true, |start| now.saturating_duration_since(start) > timeout)
            })
            .map(|(id, _)| *id)
            .collect();

        for id in &stale {
            if let Some(node) = self.pending.remove(id) {
                pool.release(node);
            }
        }

        stale.len()
    }

    fn end_msg(
        &mut self,
        ctx: &MsgContext,
        at: Instant,
        max_nodes: usize,
        pool: &mut NodePool<NodeBox>,
    ) -> Result<()> {
        let mut node = self.pending.remove(&ctx.id).ok_or(UtilError::NoMsgCtx)?;

        let dt = node
            .start
            .map_or(0.0, |start| at.saturating_duration_since(start).as_secs_f64());
        node.second_off = dt;

        if self.total_times == 0 || dt < self.min_time {
            self.min_time = dt;
        }
        if dt > self.max_time {
            self.max_time = dt;
        }
        self.total_time += dt;
        self.total_times += 1;

        self.nodes.push(node);
        let dropped = trim_top_n(&mut self.nodes, max_nodes, |a, b| {
            a.second_off.total_cmp(&b.second_off)
        });
        pool.release_all(dropped);

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServStatsReport {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub map_msgs: BTreeMap<String, ServStatsMsg>,
}

#[derive(Debug)]
struct ServStatsState {
    msgs: BTreeMap<String, ServStatsMsg>,
    pool: NodePool<NodeBox>,
    max_nodes: usize,
    pending_timeout: Option<Duration>,
}

impl ServStatsState {
    fn new(max_nodes: usize, pending_timeout: Option<Duration>) -> Self {
        Self {
            msgs: BTreeMap::new(),
            pool: NodePool::new(max_nodes.saturating_mul(2)),
            max_nodes,
            pending_timeout,
        }
    }

    fn msg_mut<'a>(
        msgs: &'a mut BTreeMap<String, ServStatsMsg>,
        ctx: &MsgContext,
    ) -> Result<&'a mut ServStatsMsg> {
        if ctx.name.is_empty() {
            return Err(UtilError::NoMsgName);
        }
        msgs.get_mut(&ctx.name)
            .ok_or_else(|| UtilError::InvalidMsgName(ctx.name.clone()))
    }

    fn start_msg(&mut self, ctx: &MsgContext, at: Instant) -> Result<()> {
        Self::msg_mut(&mut self.msgs, ctx)?.start_msg(ctx, at, &mut self.pool)
    }

    fn end_msg(&mut self, ctx: &MsgContext, at: Instant) -> Result<()> {
        let max_nodes = self.max_nodes;
        Self::msg_mut(&mut self.msgs, ctx)?.end_msg(ctx, at, max_nodes, &mut self.pool)
    }

    /// Drops pending contexts older than the configured timeout across all
    /// message kinds.
    fn evict_stale(&mut self, now: Instant) -> usize {
        let Some(timeout) = self.pending_timeout else {
            return 0;
        };

        let pool = &mut self.pool;
        self.msgs
            .values_mut()
            .map(|msg| msg.evict_stale(now, timeout, pool))
            .sum()
    }

    fn report(&self) -> ServStatsReport {
        ServStatsReport {
            map_msgs: self.msgs.clone(),
        }
    }
}

enum StatsCommand {
    Start(MsgContext, Instant),
    End(MsgContext, Instant),
    Flush,
    Stop,
}

/// Times registered message kinds between `start_msg` and `end_msg`.
///
/// Events are queued to a single background task, which owns all updates
/// and writes `<path_output>/<unix>.json` every output interval.
pub struct ServStats {
    state: Arc<Mutex<ServStatsState>>,
    chan_size: usize,
    period: Duration,
    path_output: PathBuf,
    tx: Option<mpsc::Sender<StatsCommand>>,
    handle: Option<JoinHandle<()>>,
}

impl ServStats {
    pub fn new(config: &StatsConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(ServStatsState::new(
                config.max_nodes,
                config.pending_timeout(),
            ))),
            chan_size: config.chan_size.max(1),
            period: config.output_interval(),
            path_output: config.path_output.clone(),
            tx: None,
            handle: None,
        }
    }

    pub async fn reg_msg(&self, name: impl Into<String>) {
        let name = name.into();
        self.state
            .lock()
            .await
            .msgs
            .insert(name.clone(), ServStatsMsg::new(name));
    }

    /// Spawns the background loop. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        if self.tx.is_some() {
            warn!("ServStats::start: already running");
            return;
        }

        let (tx, rx) = mpsc::channel(self.chan_size);
        let handle = tokio::spawn(run_loop(
            self.state.clone(),
            rx,
            self.period,
            self.path_output.clone(),
        ));

        self.tx = Some(tx);
        self.handle = Some(handle);
    }

    pub fn is_running(&self) -> bool {
        self.tx.is_some()
    }

    pub async fn start_msg(&self, ctx: &MsgContext) -> Result<()> {
        self.send(StatsCommand::Start(ctx.clone(), Instant::now()))
            .await
    }

    pub async fn end_msg(&self, ctx: &MsgContext) -> Result<()> {
        self.send(StatsCommand::End(ctx.clone(), Instant::now()))
            .await
    }

    /// Asks the loop to write a report now.
    pub async fn flush(&self) -> Result<()> {
        self.send(StatsCommand::Flush).await
    }

    /// Stops the loop after it has drained queued events, then writes a
    /// final report and returns its path.
    pub async fn stop(&mut self) -> Result<PathBuf> {
        let tx = self.tx.take().ok_or(UtilError::ChannelClosed)?;
        if tx.send(StatsCommand::Stop).await.is_err() {
            warn!("ServStats::stop: loop already gone");
        }

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "ServStats::stop: loop task failed");
            }
        }

        self.output().await
    }

    pub async fn snapshot(&self) -> ServStatsReport {
        self.state.lock().await.report()
    }

    pub async fn output(&self) -> Result<PathBuf> {
        let report = self.snapshot().await;
        write_report(&self.path_output, &format!("{}.json", unix_now()), &report).await
    }

    async fn send(&self, cmd: StatsCommand) -> Result<()> {
        let tx = self.tx.as_ref().ok_or(UtilError::ChannelClosed)?;
        tx.send(cmd).await.map_err(|_| UtilError::ChannelClosed)
    }
}

async fn run_loop(
    state: Arc<Mutex<ServStatsState>>,
    mut rx: mpsc::Receiver<StatsCommand>,
    period: Duration,
    path_output: PathBuf,
) {
    let mut ticker = interval(period);
    ticker.tick().await;

    loop {
        tokio::select! {
            cmd = rx.recv() => match cmd {
                Some(StatsCommand::Start(ctx, at)) => {
                    if let Err(e) = state.lock().await.start_msg(&ctx, at) {
                        log_rejected("start_msg", &ctx, &e);
                    }
                }
                Some(StatsCommand::End(ctx, at)) => {
                    if let Err(e) = state.lock().await.end_msg(&ctx, at) {
                        log_rejected("end_msg", &ctx, &e);
                    }
                }
                Some(StatsCommand::Flush) => write_snapshot(&state, &path_output).await,
                Some(StatsCommand::Stop) | None => {
                    info!("ServStats: main loop stopped");
                    break;
                }
            },
            _ = ticker.tick() => write_snapshot(&state, &path_output).await,
        }
    }
}

fn log_rejected(op: &str, ctx: &MsgContext, e: &UtilError) {
    match e {
        UtilError::DuplicateMsgCtx | UtilError::NoMsgCtx => {
            warn!(
                op = op,
                msg_name = %ctx.name,
                ctx_id = ctx.id,
                error = %e,
                "ServStats: event rejected"
            );
        }
        _ => {
            error!(
                op = op,
                msg_name = %ctx.name,
                ctx_id = ctx.id,
                error = %e,
                "ServStats: event rejected"
            );
        }
    }
}

async fn write_snapshot(state: &Mutex<ServStatsState>, dir: &Path) {
    let report = {
        let mut state = state.lock().await;
        let evicted = state.evict_stale(Instant::now());
        if evicted > 0 {
            warn!(evicted = evicted, "ServStats: dropped contexts that never ended");
        }
        state.report()
    };

    if let Err(e) = write_report(dir, &format!("{}.json", unix_now()), &report).await {
        warn!(error = %e, "ServStats: failed to write report");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> StatsConfig {
        StatsConfig {
            max_nodes: 2,
            path_output: dir.path().to_path_buf(),
            ..StatsConfig::default()
        }
    }

    #[test]
    fn test_msg_context_ids_are_unique() {
        let a = MsgContext::new("login");
        let b = MsgContext::new("login");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.name(), "login");
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_rejects_bad_events() {
        let mut state = ServStatsState::new(2, None);
        state.msgs.insert("login".to_string(), ServStatsMsg::new("login"));
        let now = Instant::now();

        assert!(matches!(
            state.start_msg(&MsgContext::new(""), now),
            Err(UtilError::NoMsgName)
        ));
        assert!(matches!(
            state.start_msg(&MsgContext::new("nope"), now),
            Err(UtilError::InvalidMsgName(name)) if name == "nope"
        ));
        assert!(matches!(
            state.end_msg(&MsgContext::new("login"), now),
            Err(UtilError::NoMsgCtx)
        ));

        let ctx = MsgContext::new("login");
        state.start_msg(&ctx, now).unwrap();
        assert!(matches!(
            state.start_msg(&ctx, now + Duration::from_secs(1)),
            Err(UtilError::DuplicateMsgCtx)
        ));

        let msg = &state.msgs["login"];
        assert_eq!(msg.pending(), 1);
        assert_eq!(msg.max_parallels, 1);

        state.end_msg(&ctx, now + Duration::from_secs(3)).unwrap();
        assert_eq!(state.msgs["login"].nodes[0].second_off, 2.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_keeps_largest_nodes() {
        let mut state = ServStatsState::new(2, None);
        state.msgs.insert("q".to_string(), ServStatsMsg::new("q"));
        let t0 = Instant::now();

        for ms in [300u64, 100, 500, 200, 400] {
            let ctx = MsgContext::new("q");
            state.start_msg(&ctx, t0).unwrap();
            state.end_msg(&ctx, t0 + Duration::from_millis(ms)).unwrap();
        }

        let msg = &state.msgs["q"];
        let offs: Vec<f64> = msg.nodes.iter().map(|n| n.second_off).collect();
        assert_eq!(offs, vec![0.5, 0.4]);
        assert_eq!(msg.total_times, 5);
        assert_eq!(msg.max_time, 0.5);
        assert_eq!(msg.min_time, 0.1);
        assert!(state.pool.len() > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unfinished_contexts_are_reported_and_evicted() {
        let mut state = ServStatsState::new(2, Some(Duration::from_secs(60)));
        state.msgs.insert("q".to_string(), ServStatsMsg::new("q"));
        let t0 = Instant::now();

        let old = MsgContext::new("q");
        let fresh = MsgContext::new("q");
        state.start_msg(&old, t0).unwrap();
        state.start_msg(&fresh, t0 + Duration::from_secs(50)).unwrap();

        let json = serde_json::to_value(state.report()).unwrap();
        assert_eq!(json["mapMsgs"]["q"]["noEndNodes"], 2);

        assert_eq!(state.evict_stale(t0 + Duration::from_secs(61)), 1);
        assert_eq!(state.msgs["q"].pending(), 1);
        assert!(matches!(
            state.end_msg(&old, t0 + Duration::from_secs(62)),
            Err(UtilError::NoMsgCtx)
        ));

        state.end_msg(&fresh, t0 + Duration::from_secs(62)).unwrap();
        let json = serde_json::to_value(state.report()).unwrap();
        assert!(json["mapMsgs"]["q"].get("noEndNodes").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_eviction_disabled_without_timeout() {
        let mut state = ServStatsState::new(2, None);
        state.msgs.insert("q".to_string(), ServStatsMsg::new("q"));
        let t0 = Instant::now();

        state.start_msg(&MsgContext::new("q"), t0).unwrap();
        assert_eq!(state.evict_stale(t0 + Duration::from_secs(86_400)), 0);
        assert_eq!(state.msgs["q"].pending(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timing_through_loop() {
        let dir = TempDir::new().unwrap();
        let mut stats = ServStats::new(&test_config(&dir));
        stats.reg_msg("login").await;
        stats.reg_msg("idle").await;
        stats.start();
        assert!(stats.is_running());

        let a = MsgContext::new("login");
        let b = MsgContext::new("login");
        stats.start_msg(&a).await.unwrap();
        stats.start_msg(&b).await.unwrap();
        tokio::time::advance(Duration::from_millis(250)).await;
        stats.end_msg(&a).await.unwrap();
        tokio::time::advance(Duration::from_millis(500)).await;
        stats.end_msg(&b).await.unwrap();

        stats.start_msg(&MsgContext::new("unknown")).await.unwrap();

        let path = stats.stop().await.unwrap();
        assert!(!stats.is_running());

        let report = stats.snapshot().await;
        let login = &report.map_msgs["login"];
        assert_eq!(login.total_times, 2);
        assert_eq!(login.total_time, 1.0);
        assert_eq!(login.min_time, 0.25);
        assert_eq!(login.max_time, 0.75);
        assert_eq!(login.max_parallels, 2);
        assert_eq!(login.pending(), 0);
        assert!(!report.map_msgs.contains_key("unknown"));

        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(written["mapMsgs"]["login"]["totalTimes"], 2);
        assert_eq!(written["mapMsgs"]["login"]["nodes"][0]["secondOff"], 0.25);
        assert_eq!(written["mapMsgs"]["idle"], serde_json::json!({"name": "idle"}));
    }

    #[tokio::test]
    async fn test_events_need_a_running_loop() {
        let dir = TempDir::new().unwrap();
        let mut stats = ServStats::new(&test_config(&dir));

        let ctx = MsgContext::new("login");
        assert!(matches!(stats.start_msg(&ctx).await, Err(UtilError::ChannelClosed)));
        assert!(matches!(stats.stop().await, Err(UtilError::ChannelClosed)));
    }

    #[tokio::test]
    async fn test_flush_writes_report() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("stats");
        let config = StatsConfig {
            path_output: out.clone(),
            ..StatsConfig::default()
        };

        let mut stats = ServStats::new(&config);
        stats.reg_msg("ping").await;
        stats.start();
        stats.flush().await.unwrap();
        stats.stop().await.unwrap();

        let files: Vec<_> = std::fs::read_dir(&out).unwrap().flatten().collect();
        assert!(!files.is_empty());
        assert!(files
            .iter()
            .all(|f| f.path().extension().and_then(|e| e.to_str()) == Some("json")));
    }
}
