use crate::error::ActivationError;
use async_trait::async_trait;
use log::info;
use std::path::PathBuf;
use std::process::Stdio;
use tabs_protocol::ActivationRef;
use tokio::process::Command;

/// Brings a previously indexed tab to focus. Failures are not retried.
#[async_trait]
pub trait ActivationSink: Send + Sync {
    async fn activate(&self, target: &ActivationRef) -> Result<(), ActivationError>;
}

/// Runs `<program> <source> <windowId> <tabIndex>`.
#[derive(Debug, Clone)]
pub struct ProcessActivator {
    program: PathBuf,
}

impl ProcessActivator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl ActivationSink for ProcessActivator {
    async fn activate(&self, target: &ActivationRef) -> Result<(), ActivationError> {
        info!(
            "Focusing {} window {} tab {}",
            target.source, target.window_id, target.tab_index
        );
        let status = Command::new(&self.program)
            .arg(&target.source)
            .arg(target.window_id.to_string())
            .arg(target.tab_index.to_string())
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|err| ActivationError::Launch {
                program: self.program.display().to_string(),
                err,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(ActivationError::Failed {
                code: status.code(),
            })
        }
    }
}
