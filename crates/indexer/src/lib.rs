//! # Tabs Indexer
//!
//! Keeps a searchable index of open browser tabs fresh while queries are
//! being answered.
//!
//! ## Pipeline
//!
//! ```text
//! query ──> QueryGate ──(trigger)──> IndexCoordinator
//!                                        │
//!                                        ├──> RefreshWorker (one per source)
//!                                        │      ├─> SourceFetcher (list program)
//!                                        │      ├─> dedupe (title, url)
//!                                        │      └─> search strings
//!                                        │
//!                                        └──> publish ─> merged snapshot swap
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tabs_indexer::{IndexCoordinator, ProcessFetcher};
//!
//! #[tokio::main]
//! async fn main() -> tabs_indexer::Result<()> {
//!     let coordinator = IndexCoordinator::new(Arc::new(ProcessFetcher::new("list-tabs")))?;
//!     coordinator.request_refresh(["Safari", "Chrome"]);
//!     coordinator.join_workers().await;
//!
//!     println!("{} tabs indexed", coordinator.current_index().len());
//!     Ok(())
//! }
//! ```

mod activation;
mod config;
mod coordinator;
mod dedupe;
mod error;
mod fetcher;
mod gate;
mod search_string;
mod service;
mod worker;

pub use activation::{ActivationSink, ProcessActivator};
pub use config::SourcesConfig;
pub use coordinator::{IndexCoordinator, IndexUpdate, MergedIndex, SourceHealth};
pub use dedupe::dedupe_records;
pub use error::{ActivationError, ConfigError, DecodeError, FetchError, IndexerError, Result};
pub use fetcher::{
    parse_record_line, OutputChannel, ProcessFetcher, RecordItem, RecordSink, RecordStream,
    SourceFetcher,
};
pub use gate::{GatePhase, QueryGate, DEFAULT_DEBOUNCE};
pub use search_string::build_search_string;
pub use service::TabService;
pub use worker::{build_indexed_item, collect_batch, WorkerPhase};
