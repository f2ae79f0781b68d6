//! kanban task command implementations.

use std::path::PathBuf;

use serde::Serialize;

use crate::board::ListId;
use crate::cli::load_context;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::session::Outcome;

pub struct AddOptions {
    pub text: String,
    pub list: Option<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct EditOptions {
    pub id: String,
    pub text: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct MvOptions {
    pub id: String,
    pub list: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RmOptions {
    pub id: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct HistoryOptions {
    pub id: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = load_context(options.dir)?;
    let list = match options.list.as_deref() {
        Some(value) => value.parse::<ListId>()?,
        None => ctx.config.ui.default_list,
    };
    let outcome = ctx.session.create(list, &options.text)?;
    emit_outcome(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "add",
        &outcome,
        Some(list),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let mut ctx = load_context(options.dir)?;
    let outcome = ctx.session.edit(&options.id, &options.text)?;
    let list = ctx.session.board().locate(&options.id).map(|(list, _)| list);
    emit_outcome(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "edit",
        &outcome,
        list,
    )
}

pub fn run_mv(options: MvOptions) -> Result<()> {
    let mut ctx = load_context(options.dir)?;
    let target = match options.list.parse::<ListId>() {
        Ok(list) => Some(list),
        Err(err) => {
            tracing::debug!(error = %err, "move target not a list, cancelling");
            None
        }
    };
    let outcome = ctx.session.move_task(&options.id, target)?;
    emit_outcome(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "mv",
        &outcome,
        target,
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut ctx = load_context(options.dir)?;
    let outcome = ctx.session.delete(&options.id)?;
    emit_outcome(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "rm",
        &outcome,
        None,
    )
}

#[derive(Serialize)]
struct HistoryOutput<'a> {
    id: &'a str,
    text: &'a str,
    list: ListId,
    entries: Vec<String>,
}

pub fn run_history(options: HistoryOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let task = ctx.session.task(&options.id)?;
    let entries = ctx.session.history(&options.id)?;
    let list = ctx
        .session
        .board()
        .locate(&options.id)
        .map(|(list, _)| list)
        .unwrap_or(ListId::Todo);

    let mut human = HumanOutput::new(format!("{} [{}]", task.text, list.title()));
    for entry in &entries {
        human.push_detail(entry.clone());
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "history",
        &HistoryOutput {
            id: &task.id,
            text: &task.text,
            list,
            entries,
        },
        Some(&human),
    )
}

/// Print the notification for a mutating gesture.
///
/// Rejected or cancelled gestures print nothing at all.
fn emit_outcome(
    options: OutputOptions,
    command: &str,
    outcome: &Outcome,
    list: Option<ListId>,
) -> Result<()> {
    let Some(message) = outcome.message.as_deref() else {
        return Ok(());
    };

    let mut human = HumanOutput::new(message);
    if let Some(id) = outcome.task_id.as_deref() {
        human.push_summary("ID", id);
    }
    if let Some(list) = list {
        human.push_summary("List", list.title());
    }

    emit_success(options, command, outcome, Some(&human))
}
