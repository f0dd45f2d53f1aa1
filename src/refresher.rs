//! Background snapshot refresh.
//!
//! The [`BackgroundRefresher`] polls a [`DataSource`] on a fixed period and
//! hands every snapshot it gets to the board through a [`SnapshotHandle`].
//! Fetching runs on tokio's blocking pool so a slow source never stalls the
//! timer, and a failed fetch is logged and retried on the next period.

use crate::board::SnapshotHandle;
use crate::data::BoardState;
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Produces board snapshots. Implementations may block (network, disk).
pub trait DataSource: Send + Sync + 'static {
    fn fetch(&self) -> anyhow::Result<BoardState>;
}

/// Always returns the same snapshot.
#[derive(Debug, Clone)]
pub struct StaticSource {
    state: BoardState,
}

impl StaticSource {
    pub fn new(state: BoardState) -> Self {
        Self { state }
    }
}

impl DataSource for StaticSource {
    fn fetch(&self) -> anyhow::Result<BoardState> {
        Ok(self.state.clone())
    }
}

/// Reads a JSON-encoded [`BoardState`] from disk on every fetch, so the file
/// can be edited while the board runs.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for JsonFileSource {
    fn fetch(&self) -> anyhow::Result<BoardState> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        let state = serde_json::from_str(&text)
            .with_context(|| format!("cannot parse board state in {}", self.path.display()))?;
        Ok(state)
    }
}

/// Counters returned when a refresher shuts down.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    pub successes: u64,
    pub failures: u64,
}

pub struct BackgroundRefresher;

impl BackgroundRefresher {
    /// Starts polling `source` every `period` on the current tokio runtime.
    /// The first fetch happens immediately.
    pub fn spawn(source: Arc<dyn DataSource>, handle: SnapshotHandle, period: Duration) -> RefresherHandle {
        let cancel = CancellationToken::new();
        let join = tokio::spawn(run(source, handle, period, cancel.clone()));
        RefresherHandle { cancel, join }
    }
}

async fn run(
    source: Arc<dyn DataSource>,
    handle: SnapshotHandle,
    period: Duration,
    cancel: CancellationToken,
) -> RefreshReport {
    let mut report = RefreshReport::default();
    let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log::debug!("Refresher started, period {:?}", period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let src = source.clone();
        let fetch = tokio::task::spawn_blocking(move || src.fetch());

        tokio::select! {
            _ = cancel.cancelled() => break,
            res = fetch => match res {
                Ok(Ok(state)) => {
                    handle.ingest(state);
                    report.successes += 1;
                }
                Ok(Err(e)) => {
                    log::warn!("Refresh failed, retrying in {:?}: {:#}", period, e);
                    report.failures += 1;
                }
                Err(e) => {
                    log::error!("Refresh task aborted: {}", e);
                    report.failures += 1;
                }
            }
        }
    }

    log::info!(
        "Refresher stopped after {} successful and {} failed refreshes",
        report.successes,
        report.failures
    );
    report
}

/// Controls a running refresher.
#[derive(Debug)]
pub struct RefresherHandle {
    cancel: CancellationToken,
    join: JoinHandle<RefreshReport>,
}

impl RefresherHandle {
    /// Cancels the pending timer (and any fetch in flight) and waits for the
    /// task to finish.
    pub async fn shutdown(self) -> RefreshReport {
        self.cancel.cancel();
        match self.join.await {
            Ok(report) => report,
            Err(e) => {
                log::error!("Refresher task failed: {}", e);
                RefreshReport::default()
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}
