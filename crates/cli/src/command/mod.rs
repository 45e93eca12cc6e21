mod config;
mod focus;
mod list;
mod query;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tabs_indexer::OutputChannel;

#[derive(Debug, Parser)]
#[command(name = "tabs", version, about = "Search and focus open browser tabs")]
pub struct Cli {
    /// Source config file (defaults to <config dir>/tabs-index/sources.toml)
    #[arg(long, global = true, env = "TABS_INDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Program invoked as `<program> <source>` to list tabs
    #[arg(long, global = true, env = "TABS_INDEX_LIST_PROGRAM", default_value = "list-tabs")]
    pub list_program: PathBuf,

    /// Program invoked as `<program> <source> <window-id> <tab-index>` to focus a tab
    #[arg(long, global = true, env = "TABS_INDEX_FOCUS_PROGRAM", default_value = "focus-tab")]
    pub focus_program: PathBuf,

    /// Output of the list program that carries the JSON records
    #[arg(long, global = true, value_enum, default_value_t = RecordChannel::Stderr)]
    pub records_on: RecordChannel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RecordChannel {
    Stdout,
    Stderr,
}

impl From<RecordChannel> for OutputChannel {
    fn from(channel: RecordChannel) -> Self {
        match channel {
            RecordChannel::Stdout => Self::Stdout,
            RecordChannel::Stderr => Self::Stderr,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the raw records fetched for one source, bypassing the index
    List { source: String },
    /// Refresh enabled sources and print tabs matching a query
    Query {
        text: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Emit matches as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Bring a tab to focus
    Focus {
        source: String,
        window_id: i64,
        tab_index: u32,
    },
    /// Show or change which sources are indexed
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    Show,
    Set {
        source: String,
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => default_config_path()?,
    };
    match cli.command {
        Command::List { source } => {
            list::run(&cli.list_program, cli.records_on.into(), &source).await
        }
        Command::Query {
            text,
            limit,
            json,
        } => {
            let programs = query::Programs {
                list: cli.list_program,
                focus: cli.focus_program,
                channel: cli.records_on.into(),
            };
            let options = query::QueryOptions {
                limit,
                json,
            };
            query::run(&config_path, programs, &text, options).await
        }
        Command::Focus {
            source,
            window_id,
            tab_index,
        } => focus::run(&cli.focus_program, source, window_id, tab_index).await,
        Command::Config { action } => config::run(&config_path, action),
    }
}

fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("cannot determine the user config directory")?;
    Ok(base.join("tabs-index").join("sources.toml"))
}
