mod cli;
mod config;
mod service;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use crate::cli::Cli;
use crate::config::Config;
use crate::service::AuditService;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let kinds = cli.requested();
    if kinds.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    // Load configuration, then let flags override it
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_cli(&cli);

    let summary = AuditService::new(config).run(&kinds)?;

    if cli.json {
        println!("{}", summary.to_json()?);
    } else {
        println!("{summary}");
    }

    Ok(())
}
