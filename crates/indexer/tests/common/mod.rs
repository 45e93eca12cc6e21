#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tabs_indexer::{
    ActivationError, ActivationSink, DecodeError, FetchError, RecordStream, SourceFetcher,
};
use tabs_protocol::{ActivationRef, SourceRecord};
use tokio::sync::Semaphore;

pub fn tab(source: &str, title: &str, url: &str, window_id: i64, tab_index: u32) -> SourceRecord {
    SourceRecord::new(source, title, url, window_id, tab_index)
}

/// Scripted per-source answers; every fetch waits for a permit when gated.
#[derive(Default)]
pub struct FakeFetcher {
    answers: Mutex<HashMap<String, Answer>>,
    calls: Mutex<HashMap<String, usize>>,
    total_calls: AtomicUsize,
    gate: Option<Semaphore>,
}

#[derive(Clone)]
enum Answer {
    Records(Vec<SourceRecord>, usize),
    LaunchFailure,
    ExitFailure(Vec<SourceRecord>),
    Panic,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches block until [`FakeFetcher::release`] hands out permits.
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub fn answer(&self, source: &str, records: Vec<SourceRecord>) {
        self.set(source, Answer::Records(records, 0));
    }

    pub fn answer_with_malformed(&self, source: &str, records: Vec<SourceRecord>, malformed: usize) {
        self.set(source, Answer::Records(records, malformed));
    }

    pub fn fail_launch(&self, source: &str) {
        self.set(source, Answer::LaunchFailure);
    }

    pub fn fail_after(&self, source: &str, records: Vec<SourceRecord>) {
        self.set(source, Answer::ExitFailure(records));
    }

    pub fn panic_on_fetch(&self, source: &str) {
        self.set(source, Answer::Panic);
    }

    pub fn calls(&self, source: &str) -> usize {
        self.calls.lock().unwrap().get(source).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }

    fn set(&self, source: &str, answer: Answer) {
        self.answers
            .lock()
            .unwrap()
            .insert(source.to_string(), answer);
    }
}

#[async_trait]
impl SourceFetcher for FakeFetcher {
    async fn fetch(&self, source: &str) -> Result<RecordStream, FetchError> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .calls
            .lock()
            .unwrap()
            .entry(source.to_string())
            .or_default() += 1;

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        let answer = self
            .answers
            .lock()
            .unwrap()
            .get(source)
            .cloned()
            .unwrap_or(Answer::Records(Vec::new(), 0));

        match answer {
            Answer::Records(records, malformed) => {
                let mut items: Vec<_> = records.into_iter().map(Ok).collect();
                for _ in 0..malformed {
                    items.insert(0, Err(DecodeError::EmptyUrl));
                }
                Ok(RecordStream::from_items(items, Ok(())))
            }
            Answer::LaunchFailure => Err(FetchError::Launch {
                program: "list-tabs".to_string(),
                err: std::io::Error::new(std::io::ErrorKind::NotFound, "no such program"),
            }),
            Answer::ExitFailure(records) => Ok(RecordStream::from_items(
                records.into_iter().map(Ok),
                Err(FetchError::Exited {
                    source_name: source.to_string(),
                    code: Some(1),
                }),
            )),
            Answer::Panic => panic!("list program for {source} blew up"),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub activated: Mutex<Vec<ActivationRef>>,
    pub fail: bool,
}

#[async_trait]
impl ActivationSink for RecordingSink {
    async fn activate(&self, target: &ActivationRef) -> Result<(), ActivationError> {
        self.activated.lock().unwrap().push(target.clone());
        if self.fail {
            Err(ActivationError::Failed { code: Some(1) })
        } else {
            Ok(())
        }
    }
}
