//! Leaderboard CLI - Render a Scrandle leaderboard from a spreadsheet
//!
//! Reads a CSV or Excel file of per-author results, applies the sort and
//! filter controls, and writes a styled HTML page. Can also print a text
//! table, export the filtered leaderboard, or keep a page up to date while
//! the source file changes.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use scrandle_leaderboard::export::export_leaderboard;
use scrandle_leaderboard::loader::load_entries;
use scrandle_leaderboard::render::{render_error_page, render_page, render_text, PageOptions};
use scrandle_leaderboard::{build_leaderboard, Controls, LoadCache, SortMode};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "leaderboard")]
#[command(about = "Render a sortable, filterable Scrandle leaderboard from a spreadsheet")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the leaderboard as an HTML page
    Render {
        #[command(flatten)]
        source: SourceArgs,

        /// Output HTML file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page heading and document title
        #[arg(long, default_value = "Scrandle Leaderboard")]
        title: String,
    },

    /// Print the leaderboard as a text table
    Show {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Export the filtered leaderboard to a .csv or .xlsx file
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file; the extension selects the format
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Re-render the HTML page whenever the source file changes
    Watch {
        #[command(flatten)]
        source: SourceArgs,

        /// Output HTML file
        #[arg(short, long)]
        output: PathBuf,

        /// Page heading and document title
        #[arg(long, default_value = "Scrandle Leaderboard")]
        title: String,

        /// How often to check the source file, in milliseconds
        #[arg(long, default_value = "2000")]
        interval_ms: u64,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Leaderboard spreadsheet (.xlsx, .xls, .ods, .csv or .tsv)
    #[arg(short, long, env = "LEADERBOARD_FILE", default_value = "leaderboard.xlsx")]
    input: PathBuf,

    /// Sort order
    #[arg(long, value_enum, default_value_t = SortArg::Score)]
    sort: SortArg,

    /// Minimum games played
    #[arg(long, default_value = "5")]
    min_games: u32,

    /// Only show authors who played within this many days
    #[arg(long, default_value = "7")]
    max_days: u32,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    /// Average Score (High → Low)
    Score,
    /// Games Played (High → Low)
    Games,
}

impl SourceArgs {
    fn controls(&self) -> Controls {
        Controls {
            sort: match self.sort {
                SortArg::Score => SortMode::AverageScore,
                SortArg::Games => SortMode::GamesPlayed,
            },
            min_games: self.min_games,
            max_inactive_days: self.max_days,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            source,
            output,
            title,
        } => {
            render(&source, output.as_deref(), PageOptions { title })?;
        }
        Commands::Show { source } => {
            let entries = load_entries(&source.input)?;
            let board = build_leaderboard(&entries, &source.controls());
            print!("{}", render_text(&board));
        }
        Commands::Export { source, output } => {
            let entries = load_entries(&source.input)?;
            let board = build_leaderboard(&entries, &source.controls());
            println!("{}", export_leaderboard(&board, &output)?);
        }
        Commands::Watch {
            source,
            output,
            title,
            interval_ms,
        } => {
            watch(&source, &output, &PageOptions { title }, interval_ms)?;
        }
    }

    Ok(())
}

/// Render once. A load failure still produces a page, showing the error.
fn render(source: &SourceArgs, output: Option<&Path>, options: PageOptions) -> Result<()> {
    let (page, load_result) = match load_entries(&source.input) {
        Ok(entries) => {
            let board = build_leaderboard(&entries, &source.controls());
            (render_page(&board, &options), Ok(()))
        }
        Err(e) => (render_error_page(&e.to_string(), &options), Err(e)),
    };

    match output {
        Some(path) => write_page(path, &page)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(page.as_bytes())?;
            stdout.flush()?;
        }
    }

    load_result.with_context(|| format!("Failed to load {}", source.input.display()))
}

fn watch(source: &SourceArgs, output: &Path, options: &PageOptions, interval_ms: u64) -> Result<()> {
    let controls = source.controls();
    let mut cache = LoadCache::new();
    let mut last_error: Option<String> = None;

    log::info!(
        "Watching {} every {} ms, writing {}",
        source.input.display(),
        interval_ms,
        output.display()
    );

    loop {
        match cache.get_or_load(&source.input, load_entries) {
            Ok(loaded) if loaded.reloaded || last_error.is_some() => {
                let board = build_leaderboard(&loaded.entries, &controls);
                write_page(output, &render_page(&board, options))?;
                println!(
                    "Rendered {} of {} entries to {}",
                    board.rows.len(),
                    board.total_entries,
                    output.display()
                );
                last_error = None;
            }
            Ok(_) => {}
            Err(e) => {
                let message = e.to_string();
                if last_error.as_deref() != Some(message.as_str()) {
                    log::warn!("Failed to load {}: {}", source.input.display(), message);
                    write_page(output, &render_error_page(&message, options))?;
                    last_error = Some(message);
                }
            }
        }
        std::thread::sleep(Duration::from_millis(interval_ms));
    }
}

fn write_page(path: &Path, page: &str) -> Result<()> {
    std::fs::write(path, page)
        .with_context(|| format!("Failed to write page: {}", path.display()))
}
