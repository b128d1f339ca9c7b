use serde::Serialize;
use stockpick_core::{PageRequest, SearchSource, SessionConfig, Stock};

use crate::cli::SearchArgs;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponseData<'a> {
    query: &'a str,
    page_index: u32,
    has_next_page: bool,
    results: Vec<Stock>,
}

pub async fn run(
    args: &SearchArgs,
    source: &dyn SearchSource,
    config: &SessionConfig,
    pretty: bool,
) -> Result<(), CliError> {
    let query = args.query.trim();
    if query.is_empty() {
        return Err(CliError::Command(String::from("query must not be empty")));
    }

    let request = PageRequest::new(query, args.page, config.page_size)?;
    let page = source.fetch_page(request).await?;

    output::render(
        &SearchResponseData {
            query,
            page_index: args.page,
            has_next_page: page.has_next_page,
            results: page.entries,
        },
        pretty,
    )
}
