//! Command-line shell over the PocketNote core.
//!
//! # Responsibility
//! - Parse `list|add|rm|ping` commands.
//! - Route each command through `NoteListController` on a SQLite file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;
use pocketnote_core::{NoteListController, NoteStore, SqliteStore};
use std::io::Write;
use std::path::PathBuf;

const DB_PATH_ENV: &str = "POCKETNOTE_DB_PATH";
const DEFAULT_DB_FILE: &str = "pocketnote.sqlite3";

#[derive(Parser, Debug)]
#[command(author, version, about = "Take short text notes", long_about = None)]
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to the notes database (defaults to $POCKETNOTE_DB_PATH, then ./pocketnote.sqlite3)
    #[arg(long, value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List notes in creation order
    List,
    /// Save a new note
    Add {
        /// Note text; multiple words are joined with spaces
        #[arg(value_name = "TEXT", required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Delete every note with the given id
    Rm {
        #[arg(value_name = "NOTE_ID")]
        id: String,
    },
    /// Print core health-check and version
    Ping,
}

/// Executes one parsed command, writing user-facing output to `out`.
pub fn run(args: Args, out: &mut impl Write) -> Result<()> {
    if args.command == Command::Ping {
        writeln!(out, "pocketnote_core ping={}", pocketnote_core::ping())?;
        writeln!(out, "pocketnote_core version={}", pocketnote_core::core_version())?;
        return Ok(());
    }

    let db_path = resolve_db_path(args.db);
    debug!("event=cli_open module=cli db_path={}", db_path.display());
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("failed to open notes database `{}`", db_path.display()))?;
    let mut controller = NoteListController::new(NoteStore::new(store));
    controller.load().context("failed to load notes")?;

    match args.command {
        Command::List => {
            if controller.notes().is_empty() {
                writeln!(out, "No notes.")?;
            }
            for note in controller.notes() {
                writeln!(out, "{}\t{}\t{}", note.id, note.timestamp, note.content)?;
            }
        }
        Command::Add { text } => {
            let note = controller
                .add_note(&text.join(" "))
                .context("failed to save note")?;
            writeln!(out, "{}", note.id)?;
        }
        Command::Rm { id } => {
            let before = controller.notes().len();
            controller
                .remove_note(&id)
                .with_context(|| format!("failed to delete note `{id}`"))?;
            writeln!(out, "Removed {} note(s).", before - controller.notes().len())?;
        }
        Command::Ping => {}
    }
    Ok(())
}

fn resolve_db_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| {
        std::env::var(DB_PATH_ENV)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}
