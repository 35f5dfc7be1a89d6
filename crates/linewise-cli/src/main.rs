use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use linewise_config::Config;
use linewise_engine::{Formatted, format};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

mod diff;
mod files;

/// Put Markdown prose on semantic lines
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Config file (default: ./linewise.toml, then ~/.config/linewise/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Lines shorter than this absorb the next semantic line
    #[arg(long, global = true)]
    min: Option<usize>,

    /// Merged lines stay shorter than this
    #[arg(long, global = true)]
    max: Option<usize>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reflow files in place
    Fmt {
        /// Files or globs (default: the configured include list)
        globs: Vec<String>,

        /// Print the formatted files instead of writing them
        #[arg(long)]
        stdout: bool,
    },
    /// Show what would change and fail if anything would
    Check {
        /// Files or globs (default: the configured include list)
        globs: Vec<String>,
    },
}

struct Document {
    path: PathBuf,
    source: String,
    formatted: Formatted,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::discover(cli.config.as_deref())?.with_margins(cli.min, cli.max);
    config.validate()?;
    log::info!(
        "margins: min={} max={}",
        config.margins.min,
        config.margins.max
    );

    match cli.command {
        Command::Fmt { globs, stdout } => fmt(&config, &globs, stdout),
        Command::Check { globs } => check(&config, &globs),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Read and format every file before anything is written.
fn format_all(config: &Config, globs: &[String]) -> Result<Vec<Document>> {
    let patterns = if globs.is_empty() {
        config.files.include_patterns()
    } else {
        globs.to_vec()
    };
    let paths = files::collect(&patterns, &config.files)?;
    log::info!("{} file(s) to format", paths.len());

    paths
        .into_iter()
        .map(|path| {
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let formatted = format(&source, config.margins)
                .with_context(|| format!("cannot format {}", path.display()))?;
            for skipped in &formatted.report.skipped {
                log::warn!(
                    "{}:{skipped} (paragraph left unmodified)",
                    path.display()
                );
            }
            Ok(Document {
                path,
                source,
                formatted,
            })
        })
        .collect()
}

fn fmt(config: &Config, globs: &[String], stdout: bool) -> Result<ExitCode> {
    let documents = format_all(config, globs)?;

    if stdout {
        let mut out = std::io::stdout().lock();
        for document in &documents {
            writeln!(out, "==> {} <==", document.path.display())?;
            out.write_all(document.formatted.output.as_bytes())?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut changed = 0;
    for document in &documents {
        if !document.formatted.changed(&document.source) {
            continue;
        }
        std::fs::write(&document.path, &document.formatted.output)
            .with_context(|| format!("cannot write {}", document.path.display()))?;
        log::info!("formatted {}", document.path.display());
        changed += 1;
    }
    log::info!("{changed} of {} file(s) changed", documents.len());
    Ok(ExitCode::SUCCESS)
}

fn check(config: &Config, globs: &[String]) -> Result<ExitCode> {
    let documents = format_all(config, globs)?;
    let colored = std::io::stdout().is_terminal();

    let mut out = std::io::stdout().lock();
    let mut changed = 0;
    for document in &documents {
        let diff = diff::unified(
            &document.path.display().to_string(),
            &document.source,
            &document.formatted.output,
            colored,
        );
        if !diff.is_empty() {
            out.write_all(diff.as_bytes())?;
            changed += 1;
        }
    }

    if changed > 0 {
        eprintln!("{changed} file(s) would be reformatted");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
