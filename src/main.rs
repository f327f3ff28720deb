//! # Scribe - the editing core of a terminal Markdown editor
//!
//! The binary opens a file, optionally jumps to a position and prints the
//! visible viewport the way a terminal front end would draw it.
//!
//! ```bash
//! # Print the first screen of a file
//! cargo run -- README.md
//!
//! # Jump to line 120, column 4 in a 100x30 view
//! cargo run -- README.md --goto 120:4 --width 100 --height 30
//! ```

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scribe_buffer::BufferPos;
use scribe_core::{Config, Editor, PlainRenderer};

/// Scribe - open a Markdown file and print the visible viewport
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Move the cursor to LINE:COL (1-indexed) before printing
    #[arg(short, long, value_name = "LINE:COL", value_parser = parse_goto)]
    goto: Option<BufferPos>,

    /// Viewport width in columns
    #[arg(long)]
    width: Option<u16>,

    /// Viewport height in rows
    #[arg(long)]
    height: Option<u16>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Parses `LINE:COL` or `LINE`, 1-indexed, into a buffer position.
fn parse_goto(arg: &str) -> Result<BufferPos, String> {
    let (line, col) = match arg.split_once(':') {
        Some((line, col)) => (line, col),
        None => (arg, "1"),
    };
    let parse = |part: &str| match part.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("expected a positive number, got '{part}'")),
    };
    Ok(BufferPos::new(parse(line)?, parse(col)?))
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Scribe v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if let Some(width) = args.width {
        config.editor.viewport_width = width;
    }
    if let Some(height) = args.height {
        config.editor.viewport_height = height;
    }

    let mut editor = Editor::new(config.editor);
    if let Some(path) = &args.file {
        editor.load_file(path)?;
    }
    if let Some(pos) = args.goto {
        editor.move_cursor_to(pos)?;
    }

    println!("{}", editor.render(&PlainRenderer));
    Ok(())
}
