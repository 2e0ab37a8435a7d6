//! dictionary: word definitions with spelling correction (Rust)
//!
//! Loads a plain-text dictionary once at startup, then answers lookups from one of
//! three front ends:
//! - Interactive loop on stdin (default)
//! - One-shot CLI: `define <term>`
//! - HTTP API: `serve`
//!
//! Misspelled words are corrected to the most probable word one edit away, then by
//! shared prefix, then by shared initial letter.

mod cli;
mod config;
mod dictionary;
mod error;
mod http;
mod repl;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, DefineArgs};
use dictionary::{define, ingest::load_dictionary, Dictionary};
use error::DictionaryError;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(get_exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli::resolve_config(&cli)?;
    info!(
        "Loading dictionary from {} (frequencies from {})",
        config.dictionary_dir.display(),
        config.frequency_corpus.display()
    );
    let (dictionary, _report) = load_dictionary(&config.dictionary_dir, &config.frequency_corpus);
    let dictionary = Arc::new(dictionary);

    match cli.command {
        Some(Commands::Define(args)) => execute_define_cli(dictionary, args, config.debug).await,
        Some(Commands::Serve(_)) => {
            let state = Arc::new(http::AppState {
                dictionary,
                public_domain: config.public_domain.clone(),
                default_debug: config.debug,
            });
            http::serve(state, &config.bind_addr).await
        }
        Some(Commands::Count) => {
            println!("{}", dictionary.word_count_display());
            Ok(())
        }
        Some(Commands::Repl) | None => repl::run(dictionary, config.debug).await,
    }
}

/// Execute define command in CLI mode
async fn execute_define_cli(dictionary: Arc<Dictionary>, args: DefineArgs, default_debug: bool) -> Result<()> {
    error::validate_search_term(&args.search_term)?;

    let outcome = define(dictionary, args.search_term, args.debug || default_debug).await?;
    let answer = outcome.into_answer()?;
    print!("{}", answer.render());
    Ok(())
}

/// Map an error to the process exit code
fn get_exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<DictionaryError>() {
        Some(e) => e.exit_code(),
        None => 5, // Configuration or I/O failure
    }
}
