//! Compiles a word list into a binary code point trie.
//!
//! # Usage
//!
//! ```bash
//! mktree words.txt words.trie
//! # reject input that is not well-formed UTF-8:
//! mktree --strict words.txt words.trie
//! # build statistics:
//! RUST_LOG=debug mktree words.txt words.trie
//! ```
//!
//! The input has one entry per line. The output is written only if the whole
//! trie was built and fits the format.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use libcptrie::trie::builder::build_trie_from_reader;
use libcptrie::trie::encode::encode_to_vec;
use libcptrie::trie::DecodeMode;
use tracing_subscriber::EnvFilter;

/// Compile a newline separated word list into a binary trie.
#[derive(Parser, Debug)]
#[command(name = "mktree", version)]
struct Cli {
    /// Word list, one entry per line.
    input: PathBuf,

    /// Where to write the encoded trie.
    output: PathBuf,

    /// Fail on input that is not well-formed UTF-8 instead of decoding it
    /// permissively.
    #[arg(long)]
    strict: bool,
}

fn run(cli: &Cli) -> Result<()> {
    let mode = if cli.strict {
        DecodeMode::Strict
    } else {
        DecodeMode::Permissive
    };

    let file = File::open(&cli.input)
        .with_context(|| format!("Unable to open {} for reading.", cli.input.display()))?;
    let trie = build_trie_from_reader(BufReader::new(file), mode)
        .with_context(|| format!("Unable to read {}.", cli.input.display()))?;

    let bytes =
        encode_to_vec(&trie).context("Unable to generate a tree with the current format.")?;

    fs::write(&cli.output, &bytes)
        .with_context(|| format!("Unable to open {} for writing.", cli.output.display()))?;
    tracing::info!(
        output = %cli.output.display(),
        nodes = trie.node_count(),
        bytes = bytes.len(),
        "wrote trie"
    );
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
