//! Markstream CLI - Command line interface
//!
//! Walks a file through a backtrackable character stream.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

mod config;
mod platform;

use crate::config::{apply_overrides, load_config, Overrides};
use crate::platform::{print_match, print_report};
use markstream::{find, fold_word, inspect, LogFormat};
use markstream_core::CharStream;

#[derive(Parser)]
#[command(
    name = "markstream",
    about = "Inspect and search files through a backtrackable character stream",
    version = "0.1.0"
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct CommonArgs {
    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level: silent, error, warn, info, debug, trace
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format: pretty, compact, json
    #[arg(long, global = true, default_value = "compact")]
    log_format: String,

    /// Also append logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Print every position with its unit and lookahead
    Inspect {
        file: PathBuf,
        /// Number of extra lookahead units to show
        #[arg(long, default_value_t = 0)]
        lookahead: usize,
        /// Fold letters to lower case in lookahead
        #[arg(long)]
        case_fold: bool,
        /// Stop after this many units
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Find every occurrence of a word
    Find {
        file: PathBuf,
        word: String,
        /// Match case-insensitively
        #[arg(long)]
        case_fold: bool,
    },
}

impl Command {
    fn file(&self) -> &Path {
        match self {
            Command::Inspect { file, .. } | Command::Find { file, .. } => file,
        }
    }

    fn case_fold(&self) -> bool {
        match self {
            Command::Inspect { case_fold, .. } | Command::Find { case_fold, .. } => *case_fold,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let overrides = Overrides {
        log_level: cli.common.log_level.clone(),
        case_fold: cli.command.case_fold(),
        source_name: Some(cli.command.file().display().to_string()),
    };
    let config = apply_overrides(load_config(cli.common.config.as_deref())?, &overrides)?;
    let format = LogFormat::parse(&cli.common.log_format)
        .ok_or_else(|| format!("Unknown log format '{}'", cli.common.log_format))?;

    markstream::init_with_file(&config.log, format, cli.common.log_file.as_ref())
        .map_err(|e| e.to_string())?;
    markstream::init(config);

    match &cli.command {
        Command::Inspect {
            file,
            lookahead,
            limit,
            ..
        } => handle_inspect(file, *lookahead, *limit),
        Command::Find { file, word, .. } => handle_find(file, word),
    }
}

fn handle_inspect(file: &Path, lookahead: usize, limit: Option<usize>) -> Result<(), String> {
    let mut source = open(file)?;
    let mut stream = markstream::stream(&mut source);
    tracing::info!(target: "markstream::cli", file = %file.display(), "inspect");

    let reports = inspect(&mut stream, lookahead, limit).map_err(|e| e.to_string())?;
    for report in &reports {
        print_report(report);
    }
    Ok(())
}

fn handle_find(file: &Path, word: &str) -> Result<(), String> {
    let case_fold = markstream::config::config().stream.case_fold;
    let mut source = open(file)?;
    let mut stream = markstream::stream(&mut source);
    tracing::info!(target: "markstream::cli", file = %file.display(), word, "find");

    let matches = find(&mut stream, &fold_word(word, case_fold)).map_err(|e| e.to_string())?;
    if matches.is_empty() {
        println!("No match for {:?}", word);
        return Ok(());
    }

    // 上下文只用于展示，非法字节按替换字符显示
    let bytes =
        std::fs::read(file).map_err(|e| format!("Cannot read '{}': {}", file.display(), e))?;
    let text = String::from_utf8_lossy(&bytes);
    for m in &matches {
        print_match(stream.source_name(), m, &text);
    }
    println!("{} match(es)", matches.len());
    Ok(())
}

fn open(file: &Path) -> Result<markstream::ReaderSource<std::io::BufReader<std::fs::File>>, String> {
    markstream::open_file(file).map_err(|e| format!("Cannot open '{}': {}", file.display(), e))
}
