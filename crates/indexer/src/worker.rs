use crate::coordinator::IndexCoordinator;
use crate::dedupe::dedupe_records;
use crate::error::FetchError;
use crate::fetcher::SourceFetcher;
use crate::search_string::build_search_string;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tabs_protocol::{IndexedItem, SourceRecord};

/// Lifecycle of the single refresh worker a source may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerPhase {
    Idle = 0,
    Running = 1,
    Publishing = 2,
}

impl WorkerPhase {
    pub(crate) fn load(cell: &AtomicU8) -> Self {
        match cell.load(Ordering::Acquire) {
            1 => Self::Running,
            2 => Self::Publishing,
            _ => Self::Idle,
        }
    }

    /// `Idle -> Running`; fails if any worker for the source is still alive.
    pub(crate) fn try_begin(cell: &AtomicU8) -> bool {
        cell.compare_exchange(
            Self::Idle as u8,
            Self::Running as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        )
        .is_ok()
    }
}

struct IdleOnDrop(Arc<AtomicU8>);

impl Drop for IdleOnDrop {
    fn drop(&mut self) {
        self.0.store(WorkerPhase::Idle as u8, Ordering::Release);
    }
}

/// Fetches, dedupes and indexes one source, then publishes exactly once.
pub(crate) struct RefreshWorker {
    source: String,
    fetcher: Arc<dyn SourceFetcher>,
    coordinator: IndexCoordinator,
    phase: Arc<AtomicU8>,
}

impl RefreshWorker {
    pub(crate) fn new(
        source: String,
        fetcher: Arc<dyn SourceFetcher>,
        coordinator: IndexCoordinator,
        phase: Arc<AtomicU8>,
    ) -> Self {
        Self {
            source,
            fetcher,
            coordinator,
            phase,
        }
    }

    pub(crate) async fn run(self) {
        let _idle = IdleOnDrop(self.phase.clone());
        let started = Instant::now();
        debug!("Refresh worker started for {}", self.source);

        let fetcher = self.fetcher.clone();
        let source = self.source.clone();
        let pass = tokio::spawn(async move { collect_batch(fetcher.as_ref(), &source).await });
        let outcome = match pass.await {
            Ok(outcome) => outcome,
            Err(err) => Err(FetchError::Aborted(err.to_string())),
        };

        self.phase
            .store(WorkerPhase::Publishing as u8, Ordering::Release);
        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = started.elapsed().as_millis() as u64;
        self.coordinator
            .publish_outcome(&self.source, outcome, duration_ms);
    }
}

/// Runs one complete fetch pass for `source` and turns it into a batch.
///
/// Malformed records are logged and skipped. Any failure of the pass itself
/// is returned so the caller can keep the previous batch.
pub async fn collect_batch(
    fetcher: &dyn SourceFetcher,
    source: &str,
) -> Result<Vec<IndexedItem>, FetchError> {
    let mut stream = fetcher.fetch(source).await?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    while let Some(item) = stream.next().await {
        match item {
            Ok(record) => records.push(record),
            Err(err) => {
                skipped += 1;
                warn!("Skipping record from {source}: {err}");
            }
        }
    }
    stream.finish().await?;

    let fetched = records.len();
    let unique = dedupe_records(records);
    if skipped > 0 || unique.len() != fetched {
        info!(
            "{source}: {fetched} records, {} unique, {skipped} skipped",
            unique.len()
        );
    }

    Ok(unique.iter().map(build_indexed_item).collect())
}

#[must_use]
pub fn build_indexed_item(record: &SourceRecord) -> IndexedItem {
    let search_string = build_search_string(&record.title, &record.url);
    debug!("{} -> {search_string}", record.url);
    IndexedItem::from_record(record, search_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::fetcher::RecordStream;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct OneShot(std::sync::Mutex<Option<RecordStream>>);

    #[async_trait]
    impl SourceFetcher for OneShot {
        async fn fetch(&self, _source: &str) -> Result<RecordStream, FetchError> {
            self.0
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| FetchError::Other("already fetched".to_string()))
        }
    }

    fn fetcher(stream: RecordStream) -> OneShot {
        OneShot(std::sync::Mutex::new(Some(stream)))
    }

    #[test]
    fn phase_transitions_are_exclusive() {
        let cell = AtomicU8::new(WorkerPhase::Idle as u8);
        assert!(WorkerPhase::try_begin(&cell));
        assert!(!WorkerPhase::try_begin(&cell));
        assert_eq!(WorkerPhase::load(&cell), WorkerPhase::Running);

        cell.store(WorkerPhase::Publishing as u8, Ordering::Release);
        assert!(!WorkerPhase::try_begin(&cell));
    }

    #[test]
    fn idle_guard_resets_phase() {
        let cell = Arc::new(AtomicU8::new(WorkerPhase::Publishing as u8));
        drop(IdleOnDrop(cell.clone()));
        assert_eq!(WorkerPhase::load(&cell), WorkerPhase::Idle);
        assert!(WorkerPhase::try_begin(&cell));
    }

    #[tokio::test]
    async fn skips_malformed_records_and_dedupes() {
        let stream = RecordStream::from_items(
            vec![
                Ok(SourceRecord::new("Safari", "Docs", "https://docs.example.com/guide", 1, 0)),
                Err(DecodeError::EmptyUrl),
                Ok(SourceRecord::new("Safari", "Docs v2", "https://docs.example.com/guide", 1, 0)),
                Ok(SourceRecord::new("Safari", "Docs", "https://docs.example.com/guide", 1, 3)),
            ],
            Ok(()),
        );
        let batch = collect_batch(&fetcher(stream), "Safari").await.unwrap();

        let titles: Vec<&str> = batch.iter().map(|i| i.display_text.as_str()).collect();
        assert_eq!(titles, vec!["Docs", "Docs v2"]);
        assert_eq!(batch[0].search_string, "Docs docs example com guide");
    }

    #[tokio::test]
    async fn failed_pass_discards_partial_records() {
        let stream = RecordStream::from_items(
            vec![Ok(SourceRecord::new("Chrome", "a", "https://a.com", 1, 0))],
            Err(FetchError::Exited {
                source_name: "Chrome".to_string(),
                code: Some(1),
            }),
        );
        let result = collect_batch(&fetcher(stream), "Chrome").await;
        assert!(matches!(result, Err(FetchError::Exited { .. })));
    }
}
