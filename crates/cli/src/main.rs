//! `tabs`: search and focus open browser tabs from the command line.
//!
//! Tab enumeration and focusing are delegated to two external programs
//! (`--list-program`, `--focus-program`); this binary drives the index.

use anyhow::Result;
use clap::Parser;

mod command;

use command::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries results.
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("TABS_INDEX_LOG", "warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    command::run(cli).await
}
