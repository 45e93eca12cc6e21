use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Activation error: {0}")]
    Activation(#[from] ActivationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("No async runtime available: {0}")]
    Runtime(String),
}

/// The list program could not produce a complete pass for a source.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to launch {program}: {err}")]
    Launch {
        program: String,
        #[source]
        err: std::io::Error,
    },

    #[error("list program for {source_name} exited abnormally (code {code:?})")]
    Exited {
        source_name: String,
        code: Option<i32>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("refresh task aborted: {0}")]
    Aborted(String),

    #[error("{0}")]
    Other(String),
}

/// One record line could not be turned into a `SourceRecord`.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record has an empty url")]
    EmptyUrl,

    #[error("record is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

#[derive(Error, Debug)]
pub enum ActivationError {
    #[error("failed to launch {program}: {err}")]
    Launch {
        program: String,
        #[source]
        err: std::io::Error,
    },

    #[error("focus program exited abnormally (code {code:?})")]
    Failed { code: Option<i32> },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot access {}: {err}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unknown source: {0}")]
    UnknownSource(String),
}
