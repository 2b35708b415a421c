//! Command-line front end.
//!
//! When called with a file it runs that program and exits non-zero on the first error.
//!
//! When called without argument it drops into an interactive read-evaluate-print loop where
//! variables persist from one line to the next.

use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

use anyhow::{self, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use teachlang::{parse, run, tokenize, Interpreter};

/// Interpreter for a small teaching language with numbers, booleans, strings, variables and
/// print.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Program to run.  Starts an interactive prompt when omitted.
    file: Option<PathBuf>,

    /// Print the tokens of the program instead of running it.
    #[arg(long, conflicts_with = "ast", requires = "file")]
    tokens: bool,

    /// Print the parsed program instead of running it.
    #[arg(long, requires = "file")]
    ast: bool,

    /// After a successful run, print every variable as `name = value`, sorted by name.
    #[arg(long, conflicts_with_all = ["tokens", "ast"], requires = "file")]
    vars: bool,

    /// Log pipeline stages to stderr.  RUST_LOG is honored otherwise.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    init_logging(args.verbose);

    match &args.file {
        Some(path) => run_file(path, &args)?,
        None => run_prompt()?,
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_file(path: &Path, args: &Args) -> Result<(), anyhow::Error> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    info!(path = %path.display(), bytes = source.len(), "loaded program");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.tokens {
        for (pos, token) in tokenize(&source)? {
            writeln!(out, "{}\t{:?}\t{}", pos, token.kind(), token)?;
        }
    } else if args.ast {
        for stmt in parse(&source)? {
            writeln!(out, "{}", stmt)?;
        }
    } else if args.vars {
        let env = run(&source, &mut out)?;
        for (name, value) in env.sorted() {
            writeln!(out, "{} = {}", name, value)?;
        }
    } else {
        let mut interp = Interpreter::new(&mut out);
        interp.eval(&source)?;
    }
    Ok(())
}

fn run_prompt() -> Result<(), io::Error> {
    let stdin = io::stdin();
    let mut repl_stdout = io::stdout();
    let mut interp_stdout = io::stdout();

    let mut interp = Interpreter::new(&mut interp_stdout);

    let mut input = String::new();
    loop {
        repl_stdout.write_all("> ".as_bytes())?;
        repl_stdout.flush()?;

        input.clear();
        let nbytes = stdin.read_line(&mut input)?;
        if nbytes == 0 {
            break;
        }

        match interp.eval(&input) {
            Ok(Some(value)) => writeln!(repl_stdout, "{}", value)?,
            Ok(None) => (),
            Err(e) => eprintln!("{}", e),
        }
    }

    Ok(())
}
