//! kanban - Three-List Task Board Library
//!
//! This library provides the core functionality for the kanban CLI and
//! terminal board: a fixed To Do / In Progress / Done board whose every
//! change is persisted immediately and recorded in the task's history.
//!
//! # Core Concepts
//!
//! - **Board**: the single source of truth, three ordered lists of tasks
//! - **History**: append-only log of what happened to each task
//! - **Gestures**: create, edit, delete and drag-drop, each run to
//!   completion (mutate, save, recompute analytics) by a `Session`
//!
//! # Module Organization
//!
//! - `board`: Lists, tasks and board invariants
//! - `history`: History entries and their display form
//! - `actions`: Create, edit and delete
//! - `drag`: Drag-and-drop state machine
//! - `analytics`: Counts and completion percentage
//! - `render`: Board view built from the model
//! - `session`: Gesture handle tying board, store and analytics together
//! - `store`: Board snapshot encoding and persistence
//! - `storage`: Keyed record files in the data directory
//! - `lock`: File locking and atomic writes
//! - `config`: Configuration loading from `kanban.toml`
//! - `toast`: Auto-dismissing notifications
//! - `cli`: Command-line interface using clap
//! - `ui`: Interactive terminal board

pub mod actions;
pub mod analytics;
pub mod board;
pub mod cli;
pub mod config;
pub mod drag;
pub mod error;
pub mod history;
pub mod lock;
pub mod output;
pub mod render;
pub mod session;
pub mod storage;
pub mod store;
pub mod timestamp;
pub mod toast;
pub mod ui;

pub use error::{Error, Result};
