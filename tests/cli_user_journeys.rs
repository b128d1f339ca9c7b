//! Behavior-driven tests for CLI user journeys
//!
//! These tests run the `stockpick` binary against the built-in catalog and
//! check what the user sees on stdout.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

fn stockpick(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_stockpick"))
        .args(["--source", "fixture", "--debounce-ms", "20"])
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary starts");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("write stdin");

    child.wait_with_output().expect("binary exits")
}

fn json_lines(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("every stdout line is JSON"))
        .collect()
}

// =============================================================================
// One-shot search
// =============================================================================

#[test]
fn user_can_fetch_a_later_page_of_results() {
    // Given: A query with more than one page of matches
    // When: The user asks for page 2
    let output = stockpick(&["search", "samsung", "--page", "2"], "");

    // Then: The remainder of the matches is printed with no further page
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let lines = json_lines(&output);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["query"], "samsung");
    assert_eq!(lines[0]["pageIndex"], 2);
    assert_eq!(lines[0]["hasNextPage"], false);
    assert_eq!(lines[0]["results"].as_array().map(Vec::len), Some(6));
}

#[test]
fn user_gets_a_usage_error_for_a_blank_query() {
    // When: The user searches for whitespace only
    let output = stockpick(&["search", "   "], "");

    // Then: Nothing is printed and the exit code flags bad input
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("query must not be empty"));
}

// =============================================================================
// Interactive session
// =============================================================================

#[test]
fn user_can_search_select_and_page_in_one_session() {
    // Given: A user who types a query, picks the first hit and loads more
    let script = "sam\nsamsung\n:toggle 1\n:count 005930 10\n:more\n:selected\n";

    // When: The session runs to the end of input
    let output = stockpick(&["session"], script);

    // Then: It exits cleanly
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let lines = json_lines(&output);

    // And: The selection listing names the picked stock and its count
    let selected = lines
        .iter()
        .find(|line| line.is_array())
        .expect(":selected prints the selection");
    assert_eq!(selected.as_array().map(Vec::len), Some(1));
    assert_eq!(selected[0]["stockCode"], "005930");
    assert_eq!(selected[0]["count"], "10");
    assert_eq!(selected[0]["debouncedValue"], "samsung");

    // And: The final snapshot shows both pages with the selection marked
    let last = lines.last().expect("final snapshot");
    assert_eq!(last["query"], "samsung");
    assert_eq!(last["state"], "results");
    assert_eq!(last["count"], 26);
    assert_eq!(last["pageIndex"], 2);
    assert_eq!(last["hasNextPage"], false);
    assert_eq!(last["loading"], false);
    assert_eq!(last["results"][0]["stockCode"], "005930");
    assert_eq!(last["results"][0]["selected"], true);
    assert_eq!(last["results"][1]["selected"], false);
}

#[test]
fn user_sees_no_query_after_clearing_the_box() {
    // Given: A loaded query
    // When: The user clears the search box and input ends
    let output = stockpick(&["session"], "apple\n:toggle 1\n\n");

    // Then: The final snapshot reads "no query entered" and keeps the selection
    assert!(output.status.success());
    let lines = json_lines(&output);
    let last = lines.last().expect("final snapshot");
    assert_eq!(last["state"], "no_query");
    assert_eq!(last["results"].as_array().map(Vec::len), Some(0));
    assert_eq!(last["selected"][0]["tickerCode"], "AAPL");
}

#[test]
fn user_is_told_about_a_bad_command_and_can_continue() {
    // When: A malformed command is followed by a valid one
    let output = stockpick(&["session"], "apple\n:toggle first\n:quit\n");

    // Then: The error goes to stderr and the session ends normally
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("expects a result number"));
}
