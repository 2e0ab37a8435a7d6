//! CLI mode implementation
//!
//! Provides the command-line interface for the dictionary

use crate::config::{load_config, Config};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Dictionary CLI
#[derive(Parser, Debug)]
#[command(name = "dictionary")]
#[command(about = "Word definitions with single-edit spelling correction", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to <config dir>/dictionary/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub corpus: CorpusArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Define a single word and exit
    Define(DefineArgs),
    /// Interactive lookup loop (default)
    Repl,
    /// Serve the HTTP API
    Serve(ServeArgs),
    /// Print the number of words in the dictionary
    Count,
}

/// Corpus locations
#[derive(Args, Debug, Clone, Default)]
pub struct CorpusArgs {
    /// Directory of dictionary files
    #[arg(long, global = true, env = "DICTIONARY_DIR")]
    pub dictionary_dir: Option<PathBuf>,

    /// Plain-text book used to estimate word frequencies
    #[arg(long, global = true, env = "FREQUENCY_CORPUS")]
    pub frequency_corpus: Option<PathBuf>,
}

/// Define tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DefineArgs {
    /// Word to define (case-insensitive; letters, digits, hyphen, apostrophe, space)
    #[arg(value_name = "TERM")]
    #[schemars(description = "Word to define (case-insensitive; letters, digits, hyphen, apostrophe, space)")]
    pub search_term: String,

    /// Explain how a misspelled word was corrected
    #[arg(short, long)]
    #[serde(default)]
    #[schemars(description = "Explain how a misspelled word was corrected")]
    pub debug: bool,
}

/// Serve command arguments
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Listen address, e.g. 0.0.0.0:8080
    #[arg(long, env = "DICTIONARY_API_ADDR")]
    pub addr: Option<String>,

    /// Public URL quoted in error help texts
    #[arg(long, env = "PUBLIC_DOMAIN")]
    pub public_domain: Option<String>,
}

impl CorpusArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.dictionary_dir {
            config.dictionary_dir = dir.clone();
        }
        if let Some(corpus) = &self.frequency_corpus {
            config.frequency_corpus = corpus.clone();
        }
    }
}

impl ServeArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(addr) = &self.addr {
            config.bind_addr = addr.clone();
        }
        if let Some(domain) = &self.public_domain {
            config.public_domain = domain.clone();
        }
    }
}

/// Effective configuration for this invocation
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = load_config(cli.config.as_deref())?;
    cli.corpus.apply(&mut config);
    if let Some(Commands::Serve(args)) = &cli.command {
        args.apply(&mut config);
    }
    Ok(config)
}
