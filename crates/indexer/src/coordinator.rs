use crate::error::{FetchError, IndexerError, Result};
use crate::fetcher::SourceFetcher;
use crate::worker::{RefreshWorker, WorkerPhase};
use arc_swap::ArcSwap;
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::AtomicU8;
use std::sync::Arc;
use std::time::SystemTime;
use tabs_protocol::IndexedItem;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Emitted after every worker publish.
#[derive(Debug, Clone)]
pub struct IndexUpdate {
    pub source: String,
    pub completed_at: SystemTime,
    pub duration_ms: u64,
    /// Items the source contributes after this publish.
    pub item_count: usize,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceHealth {
    pub last_success: Option<SystemTime>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
    pub last_duration_ms: Option<u64>,
    pub last_item_count: Option<usize>,
    pub indexing: bool,
}

/// Immutable, fully merged view of every source's latest batch.
#[derive(Debug, Default)]
pub struct MergedIndex {
    items: Vec<IndexedItem>,
    generation: u64,
}

impl MergedIndex {
    #[must_use]
    pub fn items(&self) -> &[IndexedItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndexedItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bumped on every swap.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self.items.as_slice(), [only] if only.is_placeholder())
    }
}

struct WorkerSlot {
    phase: Arc<AtomicU8>,
    handle: Option<JoinHandle<()>>,
}

impl WorkerSlot {
    fn idle() -> Self {
        Self {
            phase: Arc::new(AtomicU8::new(WorkerPhase::Idle as u8)),
            handle: None,
        }
    }

    fn phase(&self) -> WorkerPhase {
        WorkerPhase::load(&self.phase)
    }
}

#[derive(Default)]
struct CoordinatorState {
    /// Per-source batches in first-publish order. A missing source has never
    /// been indexed successfully.
    caches: Vec<(String, Vec<IndexedItem>)>,
    health: HashMap<String, SourceHealth>,
    workers: HashMap<String, WorkerSlot>,
    generation: u64,
}

impl CoordinatorState {
    fn install(&mut self, source: &str, batch: Vec<IndexedItem>) {
        match self.caches.iter_mut().find(|(name, _)| name == source) {
            Some(entry) => entry.1 = batch,
            None => self.caches.push((source.to_string(), batch)),
        }
    }

    fn cached_len(&self, source: &str) -> Option<usize> {
        self.caches
            .iter()
            .find(|(name, _)| name == source)
            .map(|(_, batch)| batch.len())
    }

    fn any_running(&self) -> bool {
        self.workers
            .values()
            .any(|slot| slot.phase() == WorkerPhase::Running)
    }

    fn merge(&mut self) -> MergedIndex {
        self.generation += 1;
        let items = if self.caches.is_empty() && self.any_running() {
            vec![IndexedItem::placeholder()]
        } else {
            self.caches
                .iter()
                .flat_map(|(_, batch)| batch.iter().cloned())
                .collect()
        };
        MergedIndex {
            items,
            generation: self.generation,
        }
    }
}

/// Owns the per-source refresh workers and the merged index they feed.
///
/// Reads never block on refreshes: [`current_index`](Self::current_index)
/// returns the last swapped snapshot while workers run on the runtime.
#[derive(Clone)]
pub struct IndexCoordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    fetcher: Arc<dyn SourceFetcher>,
    runtime: Handle,
    state: Mutex<CoordinatorState>,
    merged: ArcSwap<MergedIndex>,
    update_tx: broadcast::Sender<IndexUpdate>,
}

impl IndexCoordinator {
    /// Spawns workers on the runtime the caller is running in.
    pub fn new(fetcher: Arc<dyn SourceFetcher>) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| IndexerError::Runtime(e.to_string()))?;
        Ok(Self::with_runtime(fetcher, runtime))
    }

    #[must_use]
    pub fn with_runtime(fetcher: Arc<dyn SourceFetcher>, runtime: Handle) -> Self {
        let (update_tx, _) = broadcast::channel(32);
        Self {
            inner: Arc::new(CoordinatorInner {
                fetcher,
                runtime,
                state: Mutex::new(CoordinatorState::default()),
                merged: ArcSwap::from_pointee(MergedIndex::default()),
                update_tx,
            }),
        }
    }

    /// Starts a worker for every enabled source that has none alive.
    ///
    /// Returns the sources a worker was started for. Never waits on a fetch.
    pub fn request_refresh<I, S>(&self, enabled: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = self.inner.state.lock();
        let mut started = Vec::new();

        for source in enabled {
            let source = source.as_ref();
            let phase = {
                let slot = state
                    .workers
                    .entry(source.to_string())
                    .or_insert_with(WorkerSlot::idle);
                if !WorkerPhase::try_begin(&slot.phase) {
                    debug!("Refresh for {source} already in flight; skipping");
                    continue;
                }
                slot.phase.clone()
            };
            state.health.entry(source.to_string()).or_default().indexing = true;

            let worker = RefreshWorker::new(
                source.to_string(),
                self.inner.fetcher.clone(),
                self.clone(),
                phase,
            );
            let handle = self.inner.runtime.spawn(worker.run());
            if let Some(slot) = state.workers.get_mut(source) {
                slot.handle = Some(handle);
            }
            started.push(source.to_string());
        }

        if state.caches.is_empty() && state.any_running() {
            let snapshot = state.merge();
            self.inner.merged.store(Arc::new(snapshot));
        }

        if !started.is_empty() {
            info!("Refresh started for {}", started.join(", "));
        }
        started
    }

    /// Replaces `source`'s batch and swaps in a freshly merged index.
    pub fn publish(&self, source: &str, batch: Vec<IndexedItem>) {
        let count = batch.len();
        let mut state = self.inner.state.lock();
        state.install(source, batch);
        let total = self.swap_merged(&mut state);
        info!("Published {count} items for {source}; merged index holds {total}");
    }

    pub(crate) fn publish_outcome(
        &self,
        source: &str,
        outcome: std::result::Result<Vec<IndexedItem>, FetchError>,
        duration_ms: u64,
    ) {
        let now = SystemTime::now();
        let update = {
            let mut state = self.inner.state.lock();
            let update = match outcome {
                Ok(batch) => {
                    let count = batch.len();
                    let health = state.health.entry(source.to_string()).or_default();
                    health.last_success = Some(now);
                    health.last_error = None;
                    health.consecutive_failures = 0;
                    health.last_item_count = Some(count);
                    state.install(source, batch);
                    IndexUpdate {
                        source: source.to_string(),
                        completed_at: now,
                        duration_ms,
                        item_count: count,
                        success: true,
                        error: None,
                    }
                }
                Err(err) => {
                    let retained = state.cached_len(source);
                    match retained {
                        Some(count) => {
                            error!("Refresh of {source} failed, keeping {count} cached items: {err}");
                        }
                        None => error!("Refresh of {source} failed before it was ever indexed: {err}"),
                    }
                    let health = state.health.entry(source.to_string()).or_default();
                    health.last_error = Some(err.to_string());
                    health.consecutive_failures += 1;
                    IndexUpdate {
                        source: source.to_string(),
                        completed_at: now,
                        duration_ms,
                        item_count: retained.unwrap_or(0),
                        success: false,
                        error: Some(err.to_string()),
                    }
                }
            };
            let health = state.health.entry(source.to_string()).or_default();
            health.indexing = false;
            health.last_duration_ms = Some(duration_ms);

            let total = self.swap_merged(&mut state);
            info!(
                "{source} refresh finished in {duration_ms}ms; merged index holds {total}"
            );
            update
        };
        let _ = self.inner.update_tx.send(update);
    }

    fn swap_merged(&self, state: &mut CoordinatorState) -> usize {
        let snapshot = state.merge();
        let total = snapshot.len();
        self.inner.merged.store(Arc::new(snapshot));
        total
    }

    /// Latest fully merged snapshot.
    #[must_use]
    pub fn current_index(&self) -> Arc<MergedIndex> {
        self.inner.merged.load_full()
    }

    #[must_use]
    pub fn is_cached(&self, source: &str) -> bool {
        self.inner.state.lock().cached_len(source).is_some()
    }

    #[must_use]
    pub fn cached_sources(&self) -> Vec<String> {
        self.inner
            .state
            .lock()
            .caches
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    #[must_use]
    pub fn worker_phase(&self, source: &str) -> WorkerPhase {
        self.inner
            .state
            .lock()
            .workers
            .get(source)
            .map_or(WorkerPhase::Idle, WorkerSlot::phase)
    }

    #[must_use]
    pub fn health(&self, source: &str) -> Option<SourceHealth> {
        self.inner.state.lock().health.get(source).cloned()
    }

    #[must_use]
    pub fn subscribe_updates(&self) -> broadcast::Receiver<IndexUpdate> {
        self.inner.update_tx.subscribe()
    }

    /// Waits for every worker started so far, including ones started while
    /// waiting.
    pub async fn join_workers(&self) {
        loop {
            let handles: Vec<JoinHandle<()>> = {
                let mut state = self.inner.state.lock();
                state
                    .workers
                    .values_mut()
                    .filter_map(|slot| slot.handle.take())
                    .collect()
            };
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                if let Err(err) = handle.await {
                    warn!("Refresh worker did not finish cleanly: {err}");
                }
            }
        }
    }
}
