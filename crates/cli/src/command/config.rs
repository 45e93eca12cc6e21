use super::ConfigAction;
use anyhow::Result;
use std::path::Path;
use tabs_indexer::SourcesConfig;

pub fn run(path: &Path, action: ConfigAction) -> Result<()> {
    let mut config = SourcesConfig::load(path);
    match action {
        ConfigAction::Show => {
            for (name, enabled) in config.flags() {
                println!("{name}\t{enabled}");
            }
        }
        ConfigAction::Set { source, enabled } => {
            config.set_config_option(&source, enabled)?;
            config.save(path)?;
            log::info!("{source} set to {enabled} in {}", path.display());
        }
    }
    Ok(())
}
