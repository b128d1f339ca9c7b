mod search;
mod session;

use std::sync::Arc;
use std::time::Duration;

use stockpick_core::{
    FixtureSearchSource, HttpSearchSource, SearchSource, SessionConfig, SourceKind,
};
use tracing::info;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let source = build_source(cli);
    let config = build_config(cli)?;
    info!(source = %source.kind(), page_size = config.page_size, cache_mode = config.cache_mode.as_str(), "starting");

    match &cli.command {
        Command::Search(args) => search::run(args, source.as_ref(), &config, cli.pretty).await,
        Command::Session => session::run(source, config, cli.pretty).await,
    }
}

fn build_source(cli: &Cli) -> Arc<dyn SearchSource> {
    match SourceKind::from(cli.source) {
        SourceKind::Http => Arc::new(
            HttpSearchSource::new(cli.base_url.as_str()).with_timeout_ms(cli.timeout_ms),
        ),
        SourceKind::Fixture => Arc::new(FixtureSearchSource::demo()),
    }
}

fn build_config(cli: &Cli) -> Result<SessionConfig, CliError> {
    let config = SessionConfig::default()
        .with_debounce(Duration::from_millis(cli.debounce_ms))
        .with_page_size(cli.page_size)
        .with_cache_mode(cli.cache_mode.into())
        .validate()?;
    Ok(config)
}
