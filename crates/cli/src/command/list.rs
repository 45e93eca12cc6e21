use anyhow::{Context, Result};
use std::path::Path;
use tabs_indexer::{OutputChannel, ProcessFetcher, SourceFetcher};

pub async fn run(program: &Path, channel: OutputChannel, source: &str) -> Result<()> {
    let fetcher = ProcessFetcher::new(program).with_output_channel(channel);
    let mut stream = fetcher
        .fetch(source)
        .await
        .with_context(|| format!("failed to list tabs for {source}"))?;

    while let Some(item) = stream.next().await {
        match item {
            Ok(record) => println!("{}", serde_json::to_string(&record)?),
            Err(err) => log::warn!("{source}: {err}"),
        }
    }
    stream
        .finish()
        .await
        .with_context(|| format!("listing tabs for {source} did not complete"))?;
    Ok(())
}
