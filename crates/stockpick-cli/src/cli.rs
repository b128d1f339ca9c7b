//! CLI argument definitions for Stockpick.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `search` | Fetch one page of results for a query |
//! | `session` | Drive an interactive search session from stdin |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--source` | `http` | Search source (http, fixture) |
//! | `--base-url` | `$STOCKPICK_SEARCH_URL` | Catalog service root |
//! | `--page-size` | `20` | Entries requested per page |
//! | `--debounce-ms` | `500` | Quiet interval for typed input |
//! | `--cache-mode` | `refresh` | Page cache policy |
//! | `--timeout-ms` | `3000` | Request timeout in ms |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! stockpick --source fixture search samsung --page 2 --pretty
//! printf 'apple\n:toggle 1\n:selected\n' | stockpick --source fixture session
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use stockpick_core::{CacheMode, SourceKind};

/// Stockpick - incremental stock search and selection
#[derive(Debug, Parser)]
#[command(
    name = "stockpick",
    author,
    version,
    about = "Incremental stock search and selection",
    long_about = "Stockpick searches a stock catalog as you type, pages results on demand \
and keeps a selection of stocks across queries.\n\
\n\
Use 'stockpick <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Where search pages come from.
    #[arg(long, global = true, value_enum, default_value_t = SourceSelector::Http)]
    pub source: SourceSelector,

    /// Root URL of the catalog search service.
    #[arg(
        long,
        global = true,
        env = "STOCKPICK_SEARCH_URL",
        default_value = "http://localhost:8080/api/v1/stocks"
    )]
    pub base_url: String,

    /// Entries requested per page.
    #[arg(long, global = true, default_value_t = 20)]
    pub page_size: usize,

    /// Quiet interval in milliseconds before typed input is searched.
    #[arg(long, global = true, default_value_t = 500)]
    pub debounce_ms: u64,

    /// Page cache policy.
    ///
    /// - use: keep pages and serve them again without a request
    /// - refresh: always request, keep nothing (default)
    #[arg(long, global = true, value_enum, default_value_t = CacheSelector::Refresh)]
    pub cache_mode: CacheSelector,

    /// Request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 3000)]
    pub timeout_ms: u64,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Search source selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    /// The catalog service over HTTP.
    Http,
    /// Built-in demo catalog, no network.
    #[value(alias = "mock")]
    Fixture,
}

impl From<SourceSelector> for SourceKind {
    fn from(value: SourceSelector) -> Self {
        match value {
            SourceSelector::Http => Self::Http,
            SourceSelector::Fixture => Self::Fixture,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheSelector {
    Use,
    Refresh,
}

impl From<CacheSelector> for CacheMode {
    fn from(value: CacheSelector) -> Self {
        match value {
            CacheSelector::Use => Self::Use,
            CacheSelector::Refresh => Self::Refresh,
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one page of search results.
    ///
    /// # Examples
    ///
    ///   stockpick search apple
    ///   stockpick search samsung --page 2 --pretty
    Search(SearchArgs),

    /// Run an interactive search session.
    ///
    /// Each stdin line is the new content of the search box unless it starts
    /// with ':'. Commands:
    ///
    ///   :more              load the next page
    ///   :retry             re-request the page that failed
    ///   :toggle <n>        toggle the n-th result (1-based)
    ///   :remove <code>     deselect by ticker or stock code
    ///   :count <code> <v>  set the count of a selected stock
    ///   :price <code> <v>  set the price of a selected stock
    ///   :selected          print the selection
    ///   :quit              exit
    Session,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Search text matched against name, ticker and stock code.
    pub query: String,

    /// 1-based page index.
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}
