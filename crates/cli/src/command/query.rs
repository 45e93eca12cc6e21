use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabs_indexer::{
    IndexCoordinator, OutputChannel, ProcessActivator, ProcessFetcher, QueryGate, SourcesConfig,
    TabService,
};
use tabs_search::FuzzySearch;

pub struct Programs {
    pub list: PathBuf,
    pub focus: PathBuf,
    pub channel: OutputChannel,
}

pub struct QueryOptions {
    pub limit: usize,
    pub json: bool,
}

pub async fn run(
    config_path: &Path,
    programs: Programs,
    text: &str,
    options: QueryOptions,
) -> Result<()> {
    let config = SourcesConfig::load(config_path);
    if config.enabled_sources().is_empty() {
        log::warn!(
            "No sources enabled in {}; try `tabs config set Safari true`",
            config_path.display()
        );
    }

    let fetcher = ProcessFetcher::new(programs.list).with_output_channel(programs.channel);
    let coordinator = IndexCoordinator::new(Arc::new(fetcher))?;
    // A one-shot process sees a single query, which always passes the gate.
    let service = TabService::new(
        coordinator,
        QueryGate::default(),
        config,
        Arc::new(ProcessActivator::new(programs.focus)),
    );

    service.handle_query(text, true);
    service.coordinator().join_workers().await;
    let index = service.coordinator().current_index();

    let mut fuzzy = FuzzySearch::new();
    for (idx, score) in fuzzy.search(text, index.items(), options.limit) {
        let item = &index.items()[idx];
        if options.json {
            println!("{}", serde_json::to_string(item)?);
            continue;
        }
        let location = item
            .activation
            .as_ref()
            .map(|a| format!("{}:{}:{}", a.source, a.window_id, a.tab_index))
            .unwrap_or_default();
        println!(
            "{}\t{}\t{location}\t{score:.2}",
            item.display_text, item.subtitle
        );
    }
    Ok(())
}
