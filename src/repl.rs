//! Interactive lookup loop
//!
//! Reads one search term per line. A ` -d` or ` --debug` flag after the term asks
//! for the correction rationale. Ends on EOF or Ctrl-C.

use crate::dictionary::{define, Dictionary};
use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

const PROMPT: &str = "Please enter a search word: ";

/// Split a typed line into the search term and the debug switch.
///
/// The term ends at the first ` -d` (or, failing that, ` --debug`); whatever follows
/// the flag is ignored.
pub fn parse_line(line: &str) -> (&str, bool) {
    let line = line.trim_end_matches(['\n', '\r']);
    match line.find(" -d").or_else(|| line.find(" --debug")) {
        Some(idx) => (&line[..idx], true),
        None => (line, false),
    }
}

/// Run the loop on stdin/stdout until EOF or Ctrl-C
pub async fn run(dictionary: Arc<Dictionary>, default_debug: bool) -> Result<()> {
    info!("Starting interactive session");
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    tokio::select! {
        result = run_session(dictionary, stdin, &mut stdout, default_debug) => result,
        _ = tokio::signal::ctrl_c() => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(b"\nGracefully shutting down...\n").await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}

/// Drive one session over arbitrary streams
pub async fn run_session<R, W>(
    dictionary: Arc<Dictionary>,
    reader: R,
    writer: &mut W,
    default_debug: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    writer
        .write_all(format!("{}\n", dictionary.word_count_display()).as_bytes())
        .await?;

    loop {
        writer.write_all(PROMPT.as_bytes()).await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let (term, explain) = parse_line(&line);
        if term.trim().is_empty() {
            continue;
        }
        debug!("Interactive search for {:?}", term);

        let output = match define(dictionary.clone(), term, explain || default_debug)
            .await?
            .into_answer()
        {
            Ok(answer) => answer.render(),
            Err(e) => format!("---\n{}\n", e),
        };
        writer.write_all(output.as_bytes()).await?;
    }

    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
