use std::sync::Arc;

use serde::Serialize;
use stockpick_core::{
    ApplyOutcome, IdentityKey, RenderState, SearchSession, SearchSource, SelectedStock,
    SessionConfig, SessionUpdate, Stock, ToggleOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::error::CliError;
use crate::output;

/// One stdin line, parsed.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Text(&'a str),
    More,
    Retry,
    Toggle(usize),
    Remove(&'a str),
    Count(&'a str, &'a str),
    Price(&'a str, &'a str),
    Selected,
    Quit,
}

fn parse_line(line: &str) -> Result<Line<'_>, CliError> {
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Line::Text(line));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let parsed = match (name, args.as_slice()) {
        ("more", &[]) => Line::More,
        ("retry", &[]) => Line::Retry,
        ("selected", &[]) => Line::Selected,
        ("quit" | "q", &[]) => Line::Quit,
        ("toggle", &[index]) => Line::Toggle(index.parse().map_err(|_| {
            CliError::Command(format!("':toggle' expects a result number, got '{index}'"))
        })?),
        ("remove", &[code]) => Line::Remove(code),
        ("count", &[code, value]) => Line::Count(code, value),
        ("price", &[code, value]) => Line::Price(code, value),
        _ => {
            return Err(CliError::Command(format!(
                "unknown or malformed command ':{command}'"
            )))
        }
    };
    Ok(parsed)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultRow<'a> {
    #[serde(flatten)]
    stock: &'a Stock,
    selected: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    query: &'a str,
    #[serde(flatten)]
    render: RenderState,
    page_index: u32,
    has_next_page: bool,
    loading: bool,
    results: Vec<ResultRow<'a>>,
    selected: &'a [SelectedStock],
}

fn snapshot(session: &SearchSession) -> Snapshot<'_> {
    Snapshot {
        query: session.stable_value(),
        render: session.render_state(),
        page_index: session.page_index(),
        has_next_page: session.has_next_page(),
        loading: session.is_loading(),
        results: session
            .results()
            .iter()
            .map(|stock| ResultRow {
                stock,
                selected: session.is_selected(stock),
            })
            .collect(),
        selected: session.selection().entries(),
    }
}

fn selected_key(session: &SearchSession, code: &str) -> Result<IdentityKey, CliError> {
    session
        .selection()
        .find_by_code(code)
        .map(|selected| selected.identity_key().clone())
        .ok_or_else(|| CliError::Command(format!("'{code}' is not selected")))
}

/// Execute a `:` command against a settled session. Returns `false` on quit.
async fn execute(
    session: &mut SearchSession,
    line: Line<'_>,
    pretty: bool,
) -> Result<bool, CliError> {
    session.settle().await?;

    match line {
        Line::Text(_) => {}
        Line::Quit => return Ok(false),
        Line::Selected => {
            output::render(&session.selection().entries(), pretty)?;
            return Ok(true);
        }
        Line::More => {
            if session.load_more() {
                session.settle().await?;
            } else {
                debug!("no further page to load");
            }
        }
        Line::Retry => {
            if session.retry() {
                session.settle().await?;
            } else {
                debug!("nothing to retry");
            }
        }
        Line::Toggle(position) => match position
            .checked_sub(1)
            .and_then(|index| session.toggle_at(index))
        {
            None => {
                return Err(CliError::Command(format!(
                    "no result #{position} ({} shown)",
                    session.results().len()
                )))
            }
            Some(outcome) => {
                let outcome = outcome?;
                debug!(position, selected = outcome == ToggleOutcome::Selected, "toggled result");
            }
        },
        Line::Remove(code) => {
            let key = selected_key(session, code)?;
            session.remove(&key);
        }
        Line::Count(code, value) => {
            let key = selected_key(session, code)?;
            session.selection_mut().set_count(&key, value);
        }
        Line::Price(code, value) => {
            let key = selected_key(session, code)?;
            session.selection_mut().set_price(&key, value);
        }
    }

    output::render(&snapshot(session), pretty)?;
    Ok(true)
}

fn worth_rendering(update: &SessionUpdate) -> bool {
    !matches!(
        update,
        SessionUpdate::QueryUnchanged(_) | SessionUpdate::Applied(ApplyOutcome::Discarded)
    )
}

/// Interactive session over stdin. Plain lines replace the search text;
/// a snapshot is printed whenever the visible state changes.
pub async fn run(
    source: Arc<dyn SearchSource>,
    config: SessionConfig,
    pretty: bool,
) -> Result<(), CliError> {
    let mut session = SearchSession::new(source, config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    session.settle().await?;
                    output::render(&snapshot(&session), pretty)?;
                    return Ok(());
                };

                match parse_line(&line) {
                    Ok(Line::Text(text)) => session.input(text),
                    Ok(command) => match execute(&mut session, command, pretty).await {
                        Ok(true) => {}
                        Ok(false) => return Ok(()),
                        Err(error @ CliError::Session(_)) => return Err(error),
                        Err(error) => {
                            warn!(%error, "command rejected");
                            eprintln!("error: {error}");
                        }
                    },
                    Err(error) => eprintln!("error: {error}"),
                }
            }
            event = session.next_event() => {
                let update = session.handle(event?);
                if let SessionUpdate::Applied(ApplyOutcome::Failed(error)) = &update {
                    eprintln!("error: {error}");
                }
                if worth_rendering(&update) {
                    output::render(&snapshot(&session), pretty)?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_search_text() {
        assert_eq!(parse_line("samsung").expect("text"), Line::Text("samsung"));
        assert_eq!(parse_line("").expect("text"), Line::Text(""));
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse_line(":more").expect("more"), Line::More);
        assert_eq!(parse_line(":toggle 3").expect("toggle"), Line::Toggle(3));
        assert_eq!(
            parse_line(":price AAPL 187.5").expect("price"),
            Line::Price("AAPL", "187.5")
        );
        assert_eq!(parse_line(":q").expect("quit"), Line::Quit);
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(parse_line(":toggle first").is_err());
        assert!(parse_line(":count AAPL").is_err());
        assert!(parse_line(":launch").is_err());
    }

    #[tokio::test]
    async fn toggle_command_marks_the_row_selected() {
        let mut session = SearchSession::new(
            Arc::new(stockpick_core::FixtureSearchSource::demo()),
            SessionConfig::default(),
        );
        session.set_stable("AAPL");

        assert!(execute(&mut session, Line::Toggle(1), false)
            .await
            .expect("toggle"));

        let view = snapshot(&session);
        assert!(view.results[0].selected);
        assert_eq!(view.selected.len(), 1);
        assert!(execute(&mut session, Line::Toggle(0), false).await.is_err());
        assert!(execute(&mut session, Line::Toggle(9), false).await.is_err());
    }
}
