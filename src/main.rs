//! Toboggan
//!
//! Reads expressions one line at a time, parses each into a syntax tree and
//! prints the tree.

mod frontend;
mod printer;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use frontend::lexer::Lexer;
use frontend::parser::ParseOptions;

/// Toboggan expression parser
#[derive(Parser, Debug)]
#[command(name = "tbog")]
#[command(version = "0.1.0")]
#[command(about = "Parse expressions line by line and print their syntax trees")]
struct Cli {
    /// Read lines from FILE instead of standard input
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output format for parsed trees
    #[arg(long, value_enum, default_value_t = OutputFormat::Tree)]
    format: OutputFormat,

    /// Ignore tokens after a complete expression instead of rejecting the line
    #[arg(long)]
    lenient: bool,

    /// Print the token stream before each tree
    #[arg(long)]
    tokens: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Indented text, one element per line
    Tree,
    /// One compact JSON document per input line
    Json,
}

/// Per-run line counters
#[derive(Debug, Default, PartialEq, Eq)]
struct RunStats {
    parsed: usize,
    rejected: usize,
    blank: usize,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let stderr = io::stderr();

    let stats = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            run(BufReader::new(file), &mut stdout.lock(), &mut stderr.lock(), &cli)?
        }
        None => run(io::stdin().lock(), &mut stdout.lock(), &mut stderr.lock(), &cli)?,
    };

    log::info!(
        "input exhausted: {} parsed, {} rejected, {} blank",
        stats.parsed,
        stats.rejected,
        stats.blank
    );
    Ok(())
}

/// Parse every line of `input`. Trees go to `out`, rejected lines are
/// reported on `err` and do not stop the loop.
fn run(input: impl BufRead, out: &mut impl Write, err: &mut impl Write, cli: &Cli) -> Result<RunStats> {
    let options = ParseOptions { allow_trailing_tokens: cli.lenient };
    let mut stats = RunStats::default();

    for (index, line) in input.lines().enumerate() {
        let line = line.context("failed to read input line")?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        let line_no = index + 1;

        if line.trim_matches(' ').is_empty() {
            log::debug!("line {}: blank, skipped", line_no);
            stats.blank += 1;
            continue;
        }

        if cli.tokens {
            write!(out, "{}", printer::print_tokens(&Lexer::new(line).tokenize()))?;
        }

        match frontend::parse_line(line, options) {
            Ok(root) => {
                log::debug!("line {}: parsed {} spanning {}", line_no, root.kind(), root.span());
                match cli.format {
                    OutputFormat::Tree => write!(out, "{}", printer::print_tree(&root))?,
                    OutputFormat::Json => writeln!(out, "{}", printer::tree_to_json(&root)?)?,
                }
                stats.parsed += 1;
            }
            Err(e) => {
                log::warn!("line {}: {}", line_no, e);
                writeln!(err, "error: {} at {}", e, e.span())?;
                stats.rejected += 1;
            }
        }
    }

    out.flush()?;
    Ok(stats)
}
