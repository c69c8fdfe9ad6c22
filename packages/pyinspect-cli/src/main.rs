//! Look up the last error cached by the pyinspect traceback hook.
//!
//! Reads the single-slot error cache, prints a recap and a few search links.
//! Exits with status 1 when nothing has been cached yet.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

use pyinspect_core::answers::{find_answers, get_answers, AnswerSearch, QueryUrlSearch};
use pyinspect_core::{configured_cache, ErrorCache};

/// Search for answers to the last uncaught Python error
#[derive(Parser, Debug)]
#[command(name = "pyinspect-answers")]
#[command(about = "Search online for the last error caught by pyinspect", long_about = None)]
struct Cli {
    /// Cache directory (defaults to [tool.pyinspect] cache_dir, then ~/.pyinspect)
    #[arg(long, env = "PYINSPECT_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Skip the recap panel
    #[arg(long)]
    hide_panel: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct AnswersJson {
    query: String,
    doc: String,
    links: Vec<String>,
}

fn resolve_cache(cache_dir: Option<PathBuf>) -> Result<ErrorCache> {
    match cache_dir {
        Some(dir) => Ok(ErrorCache::in_dir(dir)),
        None => configured_cache().context("Could not determine home directory"),
    }
}

/// Returns whether a cached error was found.
fn run(cli: &Cli, search: &dyn AnswerSearch, out: &mut dyn Write) -> Result<bool> {
    let cache = resolve_cache(cli.cache_dir.clone())?;
    log::debug!("reading error cache at {}", cache.path().display());

    if cli.json {
        if !cache.exists() {
            return Ok(false);
        }
        let answers = find_answers(&cache, search)
            .with_context(|| format!("Failed to read {}", cache.path().display()))?;
        let json = AnswersJson {
            query: answers.record.query,
            doc: answers.record.doc,
            links: answers.links,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        return Ok(true);
    }

    let answers = get_answers(&cache, search, cli.hide_panel, out)?;
    Ok(answers.is_some())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default())
        .format_timestamp(None)
        .try_init()
        .ok();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let found = run(&cli, &QueryUrlSearch::default(), &mut stdout.lock())?;
    if !found {
        std::process::exit(1);
    }
    Ok(())
}
