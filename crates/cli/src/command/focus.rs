use anyhow::{Context, Result};
use std::path::Path;
use tabs_indexer::{ActivationSink, ProcessActivator};
use tabs_protocol::ActivationRef;

pub async fn run(program: &Path, source: String, window_id: i64, tab_index: u32) -> Result<()> {
    let target = ActivationRef {
        source,
        window_id,
        tab_index,
    };
    ProcessActivator::new(program)
        .activate(&target)
        .await
        .with_context(|| format!("failed to focus {} tab {tab_index}", target.source))
}
