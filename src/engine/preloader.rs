// Preload sequencer — warms a fixed asset list and reports percentage progress.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::progress::ProgressTracker;
use super::sink::ProgressSink;
use crate::config::PreloaderConfig;
use crate::detect::asset::AssetDescriptor;
use crate::source::traits::{AssetProbe, ProbeOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

struct RunState {
    state: PreloadState,
    tracker: ProgressTracker,
    /// Token of the current (or last) run. A run whose token is cancelled
    /// must not touch the tracker or the sink again.
    token: CancellationToken,
}

struct Inner {
    probe: Arc<dyn AssetProbe>,
    config: PreloaderConfig,
    run: Mutex<RunState>,
}

/// Cheap to clone; all clones drive the same run.
#[derive(Clone)]
pub struct Preloader {
    inner: Arc<Inner>,
}

impl Preloader {
    pub fn new(probe: Arc<dyn AssetProbe>, config: PreloaderConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                probe,
                config,
                run: Mutex::new(RunState {
                    state: PreloadState::Idle,
                    tracker: ProgressTracker::new(0),
                    token: CancellationToken::new(),
                }),
            }),
        }
    }

    pub fn state(&self) -> PreloadState {
        self.inner.run.lock().state
    }

    /// Last percentage reported in the current run.
    pub fn progress(&self) -> u8 {
        self.inner.run.lock().tracker.percent()
    }

    /// Run one preload to completion (or cancellation) on the current task.
    ///
    /// Dropping the returned future mid-run counts as teardown: the run ends
    /// `Cancelled` and the preloader can be reset.
    pub async fn run(
        &self,
        assets: Vec<AssetDescriptor>,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<PreloadState> {
        let token = self.begin(assets.len())?;
        let _guard = AbandonGuard {
            preloader: self,
            token: token.clone(),
        };
        Ok(self.drive(assets, sink, token).await)
    }

    /// Spawn one preload on the tokio runtime.
    pub fn start(
        &self,
        assets: Vec<AssetDescriptor>,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<PreloadHandle> {
        let token = self.begin(assets.len())?;
        let this = self.clone();
        let task = tokio::spawn(async move { this.drive(assets, sink, token).await });
        Ok(PreloadHandle {
            preloader: self.clone(),
            task,
        })
    }

    /// Tear down the running preload. Once this returns, the sink receives
    /// no further progress or completion callbacks from that run.
    pub fn cancel(&self) {
        let mut run = self.inner.run.lock();
        if run.state != PreloadState::Running {
            return;
        }
        run.state = PreloadState::Cancelled;
        run.token.cancel();
        info!(
            "preload cancelled at {}/{} assets",
            run.tracker.completed(),
            run.tracker.total()
        );
    }

    /// Return a finished preloader to `Idle` so it can run again.
    pub fn reset(&self) -> Result<()> {
        let mut run = self.inner.run.lock();
        if run.state == PreloadState::Running {
            bail!("cannot reset a running preload");
        }
        run.state = PreloadState::Idle;
        run.tracker = ProgressTracker::new(0);
        Ok(())
    }

    fn begin(&self, total: usize) -> Result<CancellationToken> {
        if total == 0 {
            bail!("asset list is empty");
        }

        let mut run = self.inner.run.lock();
        if run.state != PreloadState::Idle {
            bail!("preloader is {:?}; reset before starting another run", run.state);
        }

        let token = CancellationToken::new();
        *run = RunState {
            state: PreloadState::Running,
            tracker: ProgressTracker::new(total),
            token: token.clone(),
        };
        Ok(token)
    }

    async fn drive(
        &self,
        assets: Vec<AssetDescriptor>,
        sink: Arc<dyn ProgressSink>,
        token: CancellationToken,
    ) -> PreloadState {
        let total = assets.len();
        let concurrency = self.inner.config.max_concurrency;
        info!("preload started assets={} concurrency={}", total, concurrency.max(1));

        let all_settled = if concurrency <= 1 {
            self.probe_sequential(&assets, sink.as_ref(), &token).await
        } else {
            self.probe_concurrent(assets, concurrency, sink.as_ref(), &token)
                .await
        };
        if !all_settled {
            return PreloadState::Cancelled;
        }

        if !pause(self.inner.config.settle_delay(), &token).await {
            return PreloadState::Cancelled;
        }
        {
            let mut run = self.inner.run.lock();
            if token.is_cancelled() {
                return PreloadState::Cancelled;
            }
            if let Some(percent) = run.tracker.finish() {
                sink.on_progress(percent);
            }
        }

        if !pause(self.inner.config.finish_delay(), &token).await {
            return PreloadState::Cancelled;
        }
        {
            let mut run = self.inner.run.lock();
            if token.is_cancelled() || run.state != PreloadState::Running {
                return PreloadState::Cancelled;
            }
            run.state = PreloadState::Completed;
            sink.on_complete();
        }

        info!("preload complete assets={}", total);
        PreloadState::Completed
    }

    /// Probe in list order. Returns `false` if the run was cancelled.
    async fn probe_sequential(
        &self,
        assets: &[AssetDescriptor],
        sink: &dyn ProgressSink,
        token: &CancellationToken,
    ) -> bool {
        let timeout = self.inner.config.asset_timeout();

        for (index, asset) in assets.iter().enumerate() {
            // Losing the race drops the probe future, detaching its load.
            let outcome = tokio::select! {
                outcome = probe_one(self.inner.probe.as_ref(), asset, timeout) => outcome,
                _ = token.cancelled() => {
                    debug!("asset {} abandoned: preload cancelled", asset.url);
                    return false;
                }
            };
            log_outcome(index, asset, &outcome);

            if !self.record_settle(sink, token) {
                return false;
            }
        }
        true
    }

    /// Probe with up to `concurrency` loads in flight; progress is still
    /// recorded one settle at a time.
    async fn probe_concurrent(
        &self,
        assets: Vec<AssetDescriptor>,
        concurrency: u32,
        sink: &dyn ProgressSink,
        token: &CancellationToken,
    ) -> bool {
        let timeout = self.inner.config.asset_timeout();
        let semaphore = Arc::new(Semaphore::new(concurrency as usize));
        let mut tasks = JoinSet::new();

        for (index, asset) in assets.into_iter().enumerate() {
            let probe = Arc::clone(&self.inner.probe);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => probe_one(probe.as_ref(), &asset, timeout).await,
                    Err(e) => ProbeOutcome::Failed(e.to_string()),
                };
                (index, asset, outcome)
            });
        }

        // Returning early drops the set, which aborts every in-flight probe.
        loop {
            let joined = tokio::select! {
                joined = tasks.join_next() => joined,
                _ = token.cancelled() => return false,
            };
            match joined {
                Some(Ok((index, asset, outcome))) => log_outcome(index, &asset, &outcome),
                Some(Err(e)) => warn!("asset probe task failed: {}", e),
                None => return true,
            }

            if !self.record_settle(sink, token) {
                return false;
            }
        }
    }

    fn record_settle(&self, sink: &dyn ProgressSink, token: &CancellationToken) -> bool {
        let mut run = self.inner.run.lock();
        if token.is_cancelled() {
            return false;
        }
        let percent = run.tracker.settle();
        sink.on_progress(percent);
        true
    }
}

/// Cancels its run if still `Running` when dropped. Runs that already
/// finished or were cancelled are left alone.
struct AbandonGuard<'a> {
    preloader: &'a Preloader,
    token: CancellationToken,
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        let mut run = self.preloader.inner.run.lock();
        if self.token.is_cancelled() || run.state != PreloadState::Running {
            return;
        }
        run.state = PreloadState::Cancelled;
        self.token.cancel();
        info!("preload abandoned by caller");
    }
}

/// Handle to a spawned preload.
pub struct PreloadHandle {
    preloader: Preloader,
    task: JoinHandle<PreloadState>,
}

impl PreloadHandle {
    /// Host teardown. See [`Preloader::cancel`].
    pub fn cancel(&self) {
        self.preloader.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn wait(self) -> Result<PreloadState> {
        self.task
            .await
            .map_err(|e| anyhow!("preload task failed: {}", e))
    }
}

async fn probe_one(
    probe: &dyn AssetProbe,
    asset: &AssetDescriptor,
    timeout: Option<Duration>,
) -> ProbeOutcome {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, probe.probe(asset))
            .await
            .unwrap_or(ProbeOutcome::TimedOut),
        None => probe.probe(asset).await,
    }
}

/// Sleep for `delay`; `false` if the run was cancelled first.
async fn pause(delay: Duration, token: &CancellationToken) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(delay) => true,
        _ = token.cancelled() => false,
    }
}

fn log_outcome(index: usize, asset: &AssetDescriptor, outcome: &ProbeOutcome) {
    match outcome {
        ProbeOutcome::Ready => debug!("asset #{} {} ready", index, asset.url),
        ProbeOutcome::Failed(reason) => {
            debug!("asset #{} {} failed, continuing: {}", index, asset.url, reason)
        }
        ProbeOutcome::TimedOut => debug!("asset #{} {} timed out, continuing", index, asset.url),
    }
}
