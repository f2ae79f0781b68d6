//! Command-line interface for kanban
//!
//! This module defines the CLI structure using clap derive macros.
//! Task gestures live in `task`, whole-board views in `board`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::session::Session;
use crate::storage::Storage;
use crate::store::TaskStore;

mod board;
mod task;

/// kanban - a three-list task board
///
/// Tasks move from To Do through In Progress to Done. Every change is
/// saved immediately and recorded in the task's history.
#[derive(Parser, Debug)]
#[command(name = "kanban")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory holding the board (defaults to the platform data dir)
    #[arg(long, global = true, env = "KANBAN_DIR")]
    pub dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task to a list
    Add {
        /// Task text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Target list: list1/list2/list3 or a title such as "done"
        #[arg(short, long)]
        list: Option<String>,
    },

    /// Replace a task's text
    Edit {
        /// Task ID
        id: String,

        /// New text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Move a task onto another list
    Mv {
        /// Task ID
        id: String,

        /// Target list; anything unrecognized cancels the move
        list: String,
    },

    /// Delete a task and its history
    Rm {
        /// Task ID
        id: String,
    },

    /// Show a task's history
    History {
        /// Task ID
        id: String,
    },

    /// Print the board
    Show,

    /// Show task counts and completion
    Stats,

    /// Open the interactive board
    Ui,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Add { text, list } => task::run_add(task::AddOptions {
                text: text.join(" "),
                list,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Edit { id, text } => task::run_edit(task::EditOptions {
                id,
                text: text.join(" "),
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Mv { id, list } => task::run_mv(task::MvOptions {
                id,
                list,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Rm { id } => task::run_rm(task::RmOptions {
                id,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::History { id } => task::run_history(task::HistoryOptions {
                id,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Show => board::run_show(board::ShowOptions {
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Stats => board::run_stats(board::StatsOptions {
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Ui => board::run_ui(board::UiOptions {
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
        }
    }
}

/// Everything a command needs to act on the board
pub(crate) struct BoardContext {
    pub config: Config,
    pub session: Session,
}

/// Resolve the data directory, read its config and open the board.
pub(crate) fn load_context(dir: Option<PathBuf>) -> Result<BoardContext> {
    let storage = Storage::resolve(dir.as_deref())?;
    let config = Config::load_from_dir(storage.root());
    tracing::debug!(root = %storage.root().display(), key = %config.storage.key, "opening board");
    let store = TaskStore::new(storage, config.storage.key.clone());
    Ok(BoardContext {
        session: Session::open(store),
        config,
    })
}
