// SPDX-License-Identifier: MIT
//
// kilo — a small terminal text editor.
//
// This is the main binary that wires together the two crates:
//
//   kilo-term   → raw mode, key decoding, frame output, event loop
//   kilo-editor → rows, document, cursor, search, rendering, dispatch
//
// The Editor from kilo-editor implements kilo-term's App trait. Each
// keypress flows through:
//
//   stdin → reader thread → parser → Editor::on_key → document/cursor
//   paint → view::render_frame → output buffer → one write to the terminal
//
// Logging goes to a file (never the terminal, which the renderer owns) and
// only when --log-file is given. The filter comes from KILO_LOG.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kilo_editor::config::{self, Config};
use kilo_editor::document::Document;
use kilo_editor::editor::Editor;
use kilo_term::event_loop::{EventLoop, Exit};

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "KILO_LOG";

// ─── Command line ───────────────────────────────────────────────────────────

/// A small terminal text editor with incremental search.
#[derive(Parser, Debug)]
#[command(name = "kilo")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to edit; created on first save if it does not exist
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Tab stop width in columns
    #[arg(long, value_name = "N", default_value_t = config::TAB_STOP)]
    tab_stop: usize,

    /// Extra Ctrl-Q presses needed to quit with unsaved changes
    #[arg(long, value_name = "N", default_value_t = config::QUIT_TIMES)]
    quit_times: u8,

    /// Write logs to this file (filter with KILO_LOG, default "info")
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> Config {
        Config::default()
            .with_tab_stop(self.tab_stop)
            .with_quit_times(self.quit_times)
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn open_document(args: &Args, config: &Config) -> anyhow::Result<Document> {
    match &args.file {
        Some(path) => Document::open(path, config.tab_stop)
            .with_context(|| format!("failed to open {}", path.display())),
        None => Ok(Document::new(config.tab_stop)),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }
    tracing::info!("starting kilo v{}", env!("CARGO_PKG_VERSION"));

    let config = args.config();
    let document = open_document(&args, &config)?;

    let mut event_loop = EventLoop::new().context("failed to initialize terminal")?;
    let mut editor = Editor::new(document, config, event_loop.size());

    let exit = event_loop.run(&mut editor).context("terminal I/O failed")?;
    match exit {
        Exit::Quit => tracing::info!("exited normally"),
        Exit::Terminated => tracing::info!("terminated by signal"),
        Exit::InputClosed => tracing::warn!("input closed"),
    }
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────
