//! Marksplit - open markdown files as tabs, find/replace across them and
//! write live HTML previews.
//!
//! # Usage
//!
//! ```bash
//! marksplit README.md
//! marksplit --out-dir site docs/*.md
//! marksplit --find colour --replace color --out-dir fixed notes.md
//! marksplit --watch --out-dir site README.md
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use marksplit::app::{App, StartupError};
use marksplit::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use marksplit::highlight::set_background_mode;

/// Multi-tab markdown editing with live preview, find/replace and scroll sync
#[derive(Parser, Debug)]
#[command(name = "marksplit", version, about, long_about = None)]
struct Cli {
    /// Markdown files to open as tabs (names not ending in .md are skipped)
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Literal text to search for in every document
    #[arg(long, value_name = "TEXT")]
    find: Option<String>,

    /// Replace every match of --find with this text
    #[arg(long, value_name = "TEXT", requires = "find")]
    replace: Option<String>,

    /// Match --find case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Render code blocks without syntax highlighting
    #[arg(long)]
    no_highlight: bool,

    /// Force syntax highlight theme background (light or dark)
    #[arg(long, value_enum, default_value = "auto")]
    theme: ThemeMode,

    /// Write previews (and edited documents) into this directory
    #[arg(long, value_name = "PATH")]
    out_dir: Option<PathBuf>,

    /// Watch files for changes and re-process them
    #[arg(short, long)]
    watch: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    set_background_mode(effective.theme.unwrap_or(cli.theme).background());

    if cli.files.is_empty() {
        if cli.save || cli.clear {
            return Ok(());
        }
        anyhow::bail!("No files given");
    }
    for file in &cli.files {
        if !file.exists() {
            anyhow::bail!("File not found: {}", file.display());
        }
    }

    let app = App::new(cli.files)
        .with_find(cli.find)
        .with_replace(cli.replace)
        .with_case_sensitive(effective.case_sensitive)
        .with_json(effective.json)
        .with_highlighting(!effective.no_highlight)
        .with_out_dir(effective.out_dir)
        .with_watch(effective.watch);

    match app.run() {
        // The banner is the whole message.
        Err(err) if err.is::<StartupError>() => {
            eprintln!("{err}");
            std::process::exit(1);
        }
        result => result.context("marksplit failed"),
    }
}
