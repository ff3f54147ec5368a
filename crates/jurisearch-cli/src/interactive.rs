//! Line-oriented search loop over stdin.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::App;
use crate::display;

const PROMPT_HELP: &str =
    "Enter searches as `query | jurisdiction, jurisdiction` (`quit` to exit).";

pub async fn run(app: &mut App) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("{PROMPT_HELP}");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        let (text, labels) = match parse_line(line) {
            Ok(parsed) => parsed,
            Err(msg) => {
                eprintln!("{msg}");
                continue;
            }
        };

        eprintln!("Searching for: {text} in {}", labels.join(", "));
        match app.search(&text, &labels).await {
            Ok(count) => println!("Total results: {count}"),
            Err(e) => eprintln!("{}", display::search_failure_message(&e, app.reauth())),
        }
    }
    Ok(())
}

/// Split `query | civil, penal` into the query text and jurisdiction labels.
///
/// The last `|` separates the two, so the query itself may contain `|`.
fn parse_line(line: &str) -> Result<(String, Vec<String>), String> {
    let (text, labels) = line
        .rsplit_once('|')
        .ok_or_else(|| format!("Missing `|` separator. {PROMPT_HELP}"))?;
    let labels = labels
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();
    Ok((text.trim().to_string(), labels))
}
