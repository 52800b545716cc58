//! Prints the entries of an encoded trie that start with a prefix.
//!
//! ```bash
//! trie-complete words.trie par
//! ```

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use libcptrie::trie::reader::{TrieView, DEFAULT_COMPLETION_LIMIT};
use tracing_subscriber::EnvFilter;

/// Complete a prefix against a trie written by mktree.
#[derive(Parser, Debug)]
#[command(name = "trie-complete", version)]
struct Cli {
    /// Encoded trie.
    trie: PathBuf,

    /// Prefix to complete. ASCII letters that do not match exactly are
    /// retried with their case swapped.
    prefix: String,

    /// Maximum number of completions to print.
    #[arg(short = 'n', long, default_value_t = DEFAULT_COMPLETION_LIMIT)]
    limit: usize,
}

fn run(cli: &Cli) -> Result<()> {
    let data = fs::read(&cli.trie)
        .with_context(|| format!("Unable to open {} for reading.", cli.trie.display()))?;
    let completions = TrieView::new(&data)
        .complete(&cli.prefix, cli.limit)
        .with_context(|| format!("Malformed trie {}.", cli.trie.display()))?;

    let mut out = BufWriter::new(io::stdout().lock());
    for completion in &completions {
        writeln!(out, "{completion}")?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
