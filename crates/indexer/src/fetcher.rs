use crate::error::{DecodeError, FetchError};
use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tabs_protocol::{RawTabRecord, SourceRecord};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};

/// Produces the open tabs of one source.
///
/// A returned stream is finite and not restartable. Individual bad records
/// surface as `Err(DecodeError)` items; a failed pass surfaces from
/// [`RecordStream::finish`].
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, source: &str) -> Result<RecordStream, FetchError>;
}

pub type RecordItem = Result<SourceRecord, DecodeError>;

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// Lazy sequence of records for one fetch call.
pub struct RecordStream {
    rx: mpsc::UnboundedReceiver<RecordItem>,
    done: oneshot::Receiver<Result<(), FetchError>>,
}

/// Producer half of a [`RecordStream`].
pub struct RecordSink {
    tx: mpsc::UnboundedSender<RecordItem>,
    done: oneshot::Sender<Result<(), FetchError>>,
}

impl RecordStream {
    #[must_use]
    pub fn channel() -> (RecordSink, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = oneshot::channel();
        (
            RecordSink { tx, done: done_tx },
            Self { rx, done: done_rx },
        )
    }

    /// A stream that yields `items` and then ends with `outcome`.
    pub fn from_items(
        items: impl IntoIterator<Item = RecordItem>,
        outcome: Result<(), FetchError>,
    ) -> Self {
        let (sink, stream) = Self::channel();
        for item in items {
            sink.push(item);
        }
        sink.finish(outcome);
        stream
    }

    pub async fn next(&mut self) -> Option<RecordItem> {
        self.rx.recv().await
    }

    /// Waits for the producer to report whether the pass was complete.
    pub async fn finish(self) -> Result<(), FetchError> {
        match self.done.await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchError::Other(
                "record producer went away without reporting".to_string(),
            )),
        }
    }
}

impl RecordSink {
    /// Returns `false` once the consumer is gone.
    pub fn push(&self, item: RecordItem) -> bool {
        self.tx.send(item).is_ok()
    }

    pub fn finish(self, outcome: Result<(), FetchError>) {
        drop(self.tx);
        let _ = self.done.send(outcome);
    }
}

/// Decodes one JSON line emitted by a list program.
pub fn parse_record_line(source: &str, line: &str) -> Result<SourceRecord, DecodeError> {
    let raw: RawTabRecord = serde_json::from_str(line)?;
    if raw.url.is_empty() {
        return Err(DecodeError::EmptyUrl);
    }
    Ok(raw.into_record(source))
}

/// Which output of the list program carries the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputChannel {
    Stdout,
    /// `osascript` sends `console.log` output here.
    #[default]
    Stderr,
}

/// Runs an external list program per fetch: `<program> <source>`.
#[derive(Debug, Clone)]
pub struct ProcessFetcher {
    program: PathBuf,
    channel: OutputChannel,
}

impl ProcessFetcher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            channel: OutputChannel::default(),
        }
    }

    #[must_use]
    pub fn with_output_channel(mut self, channel: OutputChannel) -> Self {
        self.channel = channel;
        self
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl SourceFetcher for ProcessFetcher {
    async fn fetch(&self, source: &str) -> Result<RecordStream, FetchError> {
        let mut command = Command::new(&self.program);
        command.arg(source).stdin(Stdio::null()).kill_on_drop(true);
        match self.channel {
            OutputChannel::Stdout => command.stdout(Stdio::piped()).stderr(Stdio::null()),
            OutputChannel::Stderr => command.stdout(Stdio::null()).stderr(Stdio::piped()),
        };

        let program = self.program.display().to_string();
        let mut child = command.spawn().map_err(|err| FetchError::Launch {
            program: program.clone(),
            err,
        })?;
        debug!("Spawned {program} for {source}");

        let reader = match self.channel {
            OutputChannel::Stdout => child.stdout.take().map(|s| Box::new(s) as BoxedReader),
            OutputChannel::Stderr => child.stderr.take().map(|s| Box::new(s) as BoxedReader),
        }
        .ok_or_else(|| FetchError::Other(format!("{program} has no piped output")))?;

        let (sink, stream) = RecordStream::channel();
        let source = source.to_string();
        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut buf = Vec::new();
            let mut read_result = Ok(());
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf).await {
                    Ok(0) => break,
                    Ok(_) => {
                        let item = match std::str::from_utf8(&buf) {
                            Ok(line) if line.trim().is_empty() => continue,
                            Ok(line) => parse_record_line(&source, line.trim_end()),
                            Err(err) => Err(DecodeError::Utf8(err)),
                        };
                        if !sink.push(item) {
                            break;
                        }
                    }
                    Err(err) => {
                        read_result = Err(FetchError::Io(err));
                        break;
                    }
                }
            }

            let outcome = match (read_result, child.wait().await) {
                (Err(err), _) => Err(err),
                (Ok(()), Ok(status)) if status.success() => Ok(()),
                (Ok(()), Ok(status)) => Err(FetchError::Exited {
                    source_name: source,
                    code: status.code(),
                }),
                (Ok(()), Err(err)) => Err(FetchError::Io(err)),
            };
            sink.finish(outcome);
        });

        Ok(stream)
    }
}
