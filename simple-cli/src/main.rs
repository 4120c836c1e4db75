#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use simple_core::{
    common::Evaluation,
    parser::{parse_program, parse_regex},
};
use tracing_subscriber::EnvFilter;

mod driver;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a SIMPLE program read from a file
    Run {
        #[arg(value_name = "FILE")]
        path: PathBuf,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Run a SIMPLE program given on the command line
    Eval {
        source: String,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Check strings against a regular expression
    Regex {
        pattern: String,

        #[arg(required = true)]
        inputs: Vec<String>,

        /// Match with the DFA obtained by subset construction
        #[arg(long)]
        dfa: bool,
    },
}

#[derive(clap::Args)]
struct RunOptions {
    /// Evaluate directly instead of reducing one step at a time
    #[arg(long, conflicts_with_all = ["trace", "max_steps"])]
    big_step: bool,

    /// Print every intermediate statement and environment
    #[arg(long)]
    trace: bool,

    /// Give up after this many reductions
    #[arg(long, value_name = "N")]
    max_steps: Option<usize>,
}

fn run(source: &str, options: RunOptions) -> anyhow::Result<()> {
    let term = parse_program(source)?;
    if options.big_step {
        match driver::big_step(&term)? {
            Evaluation::Value(value) => println!("{value}"),
            Evaluation::Environment(env) => println!("{env}"),
        }
    } else {
        let mut stdout = std::io::stdout().lock();
        let (term, env) = driver::small_step(term, options.trace, options.max_steps, &mut stdout)?;
        if !options.trace {
            println!("{term}, {env}");
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Log to stderr (if you run with `RUST_LOG=debug`).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Run { path, options } => {
            let source = std::fs::read_to_string(path)?;
            run(&source, options)
        }
        Command::Eval { source, options } => run(&source, options),
        Command::Regex {
            pattern,
            inputs,
            dfa,
        } => {
            let pattern = parse_regex(&pattern)?;
            tracing::debug!(%pattern, "parsed");
            driver::match_all(&pattern, &inputs, dfa, &mut std::io::stdout().lock())?;
            Ok(())
        }
    }
}
